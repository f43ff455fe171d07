use clap::Parser;
use dcmsort_core::cli::{Cli, OutputFormat};
use dcmsort_core::{DicomMetadataReader, Placer, SortReport, StdFileSystem, TextReport};
use log::error;
use std::process;

/// Exit code when the run finished but some placements failed
const EXIT_PARTIAL: i32 = 2;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    // Refuse before touching any file
    if !cli.format.is_available() {
        eprintln!("Error: JSON output requires the 'json' feature");
        eprintln!("Rebuild with: cargo build --features json");
        process::exit(1);
    }

    let placer = Placer::new(
        StdFileSystem::new(),
        DicomMetadataReader::new(),
        cli.sort_options(),
    );

    let report = match placer.run() {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_report(&report, cli.format);

    if !report.is_success() {
        process::exit(EXIT_PARTIAL);
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

#[cfg(feature = "json")]
fn output_report(report: &SortReport, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(report));
        }
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize to JSON: {}", e);
                eprintln!("Error: Failed to serialize to JSON: {}", e);
                process::exit(1);
            }
        },
    }
}

/// Text only; JSON was refused before the run
#[cfg(not(feature = "json"))]
fn output_report(report: &SortReport, _format: OutputFormat) {
    println!("{}", TextReport::new(report));
}
