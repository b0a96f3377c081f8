//! # sheetfix-cli
//!
//! Convert numbers stored as text in a local spreadsheet.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use sheetfix_convert::summary::DEFAULT_SUMMARY_COLUMN;
use sheetfix_convert::{process_file, ConversionReport, ConvertOptions};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// sheetfix - turn numbers stored as text back into numbers
#[derive(Parser, Debug)]
#[command(name = "sheetfix")]
#[command(author, version, long_about = None)]
#[command(about = "Convert numbers stored as text in spreadsheets")]
struct Cli {
    /// Spreadsheet to convert (.xlsx, .xls, .csv)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the result (.xlsx or .csv)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// 0-based column to total by sign
    #[arg(long, default_value_t = DEFAULT_SUMMARY_COLUMN)]
    summary_column: usize,

    /// Do not compute the column summary
    #[arg(long)]
    no_summary: bool,

    /// Report format (table, json)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Colored summary (default)
    #[default]
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    let options = ConvertOptions::default()
        .with_summary_column((!cli.no_summary).then_some(cli.summary_column));
    debug!(?options, "conversion options");

    let report = process_file(&cli.input, &output, &options)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    match cli.format {
        OutputFormat::Table => print!("{}", render_table(&cli.input, &output, &report)),
        OutputFormat::Json => println!("{}", render_json(&cli.input, &output, &report)?),
    }
    Ok(())
}

/// `<stem>_convertido.xlsx` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "salida".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_convertido.xlsx"))
}

fn render_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "{}", title.cyan().bold());
    if items.is_empty() {
        let _ = writeln!(out, "  {}", "(none)".dimmed());
    }
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn render_table(input: &Path, output: &Path, report: &ConversionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} -> {}",
        "Converted".green().bold(),
        input.display(),
        output.display()
    );
    let _ = writeln!(out, "  {} data rows", report.rows);
    render_list(&mut out, "Numeric columns", &report.converted_columns);
    render_list(&mut out, "Date columns", &report.date_columns);

    if let Some(summary) = &report.summary {
        let _ = writeln!(out, "{}", "Summary".cyan().bold());
        let _ = writeln!(out, "  total     {:>15.2}", summary.total);
        let _ = writeln!(out, "  inflows   {:>15.2}", summary.inflows);
        let _ = writeln!(out, "  outflows  {:>15.2}", summary.outflows);
        let _ = writeln!(out, "  {} values counted", summary.counted);
    }
    out
}

fn render_json(input: &Path, output: &Path, report: &ConversionReport) -> Result<String> {
    let value = serde_json::json!({
        "input": input.display().to_string(),
        "output": output.display().to_string(),
        "report": report,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
