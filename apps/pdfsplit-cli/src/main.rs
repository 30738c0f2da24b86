//! Agreement splitter
//!
//! Detects the sections of a labor agreement PDF (table of contents,
//! chapters, appendices, letters of understanding, signatures) and writes
//! one PDF per section plus `analysis_report.txt` into `<name>_split/`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pdfsplit_core::{
    analyze_document, format_report, process_batch, process_file, BatchSummary, PatternRegistry,
    PdfDocument, SplitConfig,
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod input;

#[derive(Parser, Debug)]
#[command(name = "pdfsplit")]
#[command(version, about = "Split labor agreement PDFs into sections")]
#[command(after_help = "Examples:
  pdfsplit agreement.pdf
  pdfsplit -b ./Agreements -o ./out
  pdfsplit agreement.pdf --min-pages 3 --merge-gap 10
  pdfsplit -b ./Agreements -v --json")]
struct Args {
    /// PDF file, or directory with --batch
    input: PathBuf,

    /// Directory receiving the <name>_split folders (default: next to each PDF)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Process every PDF in the input directory
    #[arg(short, long)]
    batch: bool,

    /// Minimum pages for a section to be kept
    #[arg(long, default_value = "2")]
    min_pages: u32,

    /// Max pages between two same-type sections for them to be merged
    #[arg(long, default_value = "5")]
    merge_gap: u32,

    /// TOML file with section header patterns (default: built-in agreement patterns)
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// Worker threads for batch mode (default: one per CPU)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Print the analysis report without writing any file
    #[arg(long, conflicts_with = "batch")]
    dry_run: bool,

    /// Print results as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // stdout is reserved for reports and JSON
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("\n✗ Failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let registry = match &args.patterns {
        Some(path) => PatternRegistry::from_toml_file(path)?,
        None => PatternRegistry::agreement()?,
    };

    let mut config = SplitConfig::new(args.min_pages, args.merge_gap)?.verbose(args.verbose);
    if let Some(output) = &args.output {
        config = config.with_output_dir(output);
    }
    if let Some(jobs) = args.jobs {
        config = config.with_jobs(jobs)?;
    }

    if args.batch {
        run_batch(args, &config, &registry)
    } else if args.dry_run {
        run_dry(args, &config, &registry)
    } else {
        run_single(args, &config, &registry)
    }
}

fn run_single(
    args: &Args,
    config: &SplitConfig,
    registry: &PatternRegistry,
) -> anyhow::Result<ExitCode> {
    let report = process_file(&args.input, config, registry)
        .with_context(|| format!("Processing {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n✓ Success! Created {} file(s)", report.files_created());
        println!("  Output: {}", report.output_dir.display());
        println!("  Report: {}", report.report_path.display());
    }

    if report.files_created() < report.writes.len() {
        tracing::warn!(
            "{} of {} section file(s) could not be written",
            report.writes.len() - report.files_created(),
            report.writes.len()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_dry(
    args: &Args,
    config: &SplitConfig,
    registry: &PatternRegistry,
) -> anyhow::Result<ExitCode> {
    let document = PdfDocument::open(&args.input)?;
    let analysis = analyze_document(&document, config, registry)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        let name = args
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        print!(
            "{}",
            format_report(&name, analysis.total_pages, &analysis.sections)
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_batch(
    args: &Args,
    config: &SplitConfig,
    registry: &PatternRegistry,
) -> anyhow::Result<ExitCode> {
    let pdfs = input::find_pdfs(&args.input)?;
    if pdfs.is_empty() {
        tracing::warn!("No PDFs found in {}", args.input.display());
        return Ok(ExitCode::SUCCESS);
    }

    let outcomes = process_batch(&pdfs, config, registry)?;
    let summary = BatchSummary::from_outcomes(&outcomes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for entry in &summary.documents {
            match &entry.error {
                None => println!(
                    "✓ {}: {} section(s), {} file(s)",
                    entry.source.display(),
                    entry.sections_found,
                    entry.files_created
                ),
                Some(error) => println!("✗ {}: {}", entry.source.display(), error),
            }
        }
        println!(
            "\n{} processed, {} succeeded, {} failed, {} file(s) created",
            summary.processed, summary.succeeded, summary.failed, summary.files_created
        );
    }

    if summary.succeeded == 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
