//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dealsift: clean and deduplicate vehicle-sale customer exports
#[derive(Parser)]
#[command(name = "dealsift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect, filter and deduplicate an export
    Run {
        /// Path to the export file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the cleaned list (default: <file>.clean.csv, `-` for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file (missing keys use the defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for per-stage audit CSVs of removed rows
        #[arg(long)]
        audit_dir: Option<PathBuf>,

        /// Write the JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Evaluate the delivery-age filter as of this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show the detected column mapping without filtering
    Detect {
        /// Path to the export file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration as JSON
    Config {
        /// Write to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
