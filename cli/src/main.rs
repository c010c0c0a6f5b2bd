//! agenda2enex CLI - Agenda to Evernote converter

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use agenda2enex::{discover_agendas, BatchConverter, BatchItem, ConvertOptions};

/// Name of the report written next to the converted files.
const REPORT_FILE_NAME: &str = "report.csv";

#[derive(Parser)]
#[command(name = "agenda2enex")]
#[command(version)]
#[command(about = "Convert Agenda notebooks (.agenda) to Evernote exports (.enex)", long_about = None)]
struct Cli {
    /// Input .agenda file or directory to search
    #[arg(value_name = "INPUT", default_value = ".")]
    input: PathBuf,

    /// Output directory (must exist)
    #[arg(value_name = "OUTPUT", default_value = ".")]
    output: PathBuf,

    /// Report file (default: OUTPUT/report.csv)
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Fail a notebook on the first undecodable paragraph
    #[arg(long)]
    strict: bool,

    /// Convert notebooks one after another
    #[arg(long)]
    sequential: bool,

    /// Only print failures and the summary
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_convert(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.output.is_dir() {
        return Err(format!("Output directory not found: {}", cli.output.display()).into());
    }

    let inputs = discover_agendas(&cli.input)?;
    if inputs.is_empty() {
        println!(
            "{} {}",
            "No .agenda files found in".yellow(),
            cli.input.display()
        );
        return Ok(());
    }

    let mut options = ConvertOptions::new();
    if !cli.strict {
        options = options.lenient();
    }
    if cli.sequential {
        options = options.sequential();
    }

    let pb = if cli.quiet || inputs.len() < 2 {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb
    };

    let batch = BatchConverter::new(&cli.output, options);
    let items = batch.run_with_progress(&inputs, |item| {
        pb.set_message(item.notebook());
        pb.inc(1);
    });
    pb.finish_and_clear();

    for item in &items {
        print_item(item, cli.quiet);
    }

    let report = BatchConverter::report(&items);
    let report_path = cli
        .report
        .clone()
        .unwrap_or_else(|| cli.output.join(REPORT_FILE_NAME));
    report.write_csv(BufWriter::new(File::create(&report_path)?))?;

    print_summary(&items, report.len(), &report_path);

    Ok(())
}

fn print_item(item: &BatchItem, quiet: bool) {
    match &item.outcome {
        Ok(result) => {
            if quiet {
                return;
            }
            let notes = result.stats.note_count;
            let mut line = format!(
                "{} {} {} {} ({} note{})",
                "✓".green(),
                item.input.display(),
                "→".dimmed(),
                item.output.display(),
                notes,
                if notes == 1 { "" } else { "s" }
            );
            if !result.diagnostics.is_empty() {
                line.push_str(&format!(
                    ", {}",
                    format!("{} warnings", result.diagnostics.len()).yellow()
                ));
            }
            println!("{}", line);
        }
        Err(e) => {
            eprintln!("{} {}: {}", "✗".red(), item.input.display(), e);
        }
    }
}

fn print_summary(items: &[BatchItem], report_rows: usize, report_path: &Path) {
    let converted = items.iter().filter(|i| i.is_success()).count();
    let failed = items.len() - converted;
    let totals = BatchConverter::totals(items);

    println!();
    println!(
        "{} {} converted, {} failed",
        "Done!".green().bold(),
        converted,
        if failed > 0 {
            failed.to_string().red().to_string()
        } else {
            failed.to_string()
        }
    );
    println!(
        "{} {} notes, {} attachments, {} links",
        "Totals:".dimmed(),
        totals.note_count,
        totals.resource_count,
        totals.link_count
    );
    println!(
        "{} {} ({} entries)",
        "Report:".dimmed(),
        report_path.display(),
        report_rows
    );
}

fn cmd_version() {
    println!("{} {}", "agenda2enex".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Agenda to Evernote converter");
    println!();
    println!("Output: Evernote export format (.enex), ENML 2");
    println!("License: MIT");
}
