//! CLI argument structures

use crate::compare::ComparisonMetric;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Summarize and compare RAPL energy logs
#[derive(Parser)]
#[command(name = "rapl-report")]
#[command(about = "rapl-report - Summarize and compare RAPL energy benchmark logs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the statistics tree for one log
    Show {
        /// Log file to analyze
        file: PathBuf,

        /// Print the aggregated result as JSON
        #[arg(long)]
        json: bool,

        /// Include standard error and 95% confidence intervals
        #[arg(long)]
        confidence: bool,
    },

    /// Compare a metric across several logs
    Compare {
        /// Log files to compare, in display order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Metric to compare (energy, time, j/s, mflops/w)
        #[arg(short, long, default_value = "energy")]
        metric: ComparisonMetric,

        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write per-run execution time and energy as CSV
    Points {
        /// Log file to analyze
        file: PathBuf,
    },

    /// Browse a results directory interactively
    Interactive {
        /// Results directory (defaults to `results_dir` from config)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}
