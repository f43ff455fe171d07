pub mod report;

use crate::placer::SortOptions;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for dcmsort
#[derive(Parser, Debug)]
#[command(name = "dcmsort")]
#[command(about = "Sort DICOM files into series and echo folders")]
#[command(version)]
pub struct Cli {
    /// Folder to be sorted
    #[arg(short = 'd', long = "idir", value_name = "DIR")]
    pub input: PathBuf,

    /// Output folder, created if it does not exist
    #[arg(short = 'o', long = "odir", value_name = "DIR")]
    pub output: PathBuf,

    /// Keep the original file names
    #[arg(short = 'k', long = "keepName")]
    pub keep_name: bool,

    /// Remove the raw input folder after a run without failures
    #[arg(short = 'r', long = "rmRaw")]
    pub remove_raw: bool,

    /// Report format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Run configuration described by these arguments
    pub fn sort_options(&self) -> SortOptions {
        SortOptions::new(&self.input, &self.output)
            .with_keep_name(self.keep_name)
            .with_remove_raw(self.remove_raw)
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Whether this build can render the format
    pub fn is_available(self) -> bool {
        match self {
            OutputFormat::Text => true,
            OutputFormat::Json => cfg!(feature = "json"),
        }
    }
}
