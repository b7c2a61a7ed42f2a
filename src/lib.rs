//! # rapl-report
//!
//! Summarizes the logs written by RAPL energy benchmark runs.
//!
//! ## Usage
//!
//! ```bash
//! rapl-report show results/run1/O2-map-4t.log
//! rapl-report compare results/run1/*.log --metric mflops/w
//! ```
//!
//! ## Modules
//!
//! - `parser` - Line-oriented log parser producing a `BenchResult`
//! - `measure` - Parsed measures, packages and energy domains
//! - `stats` - Sample accumulators with min/max/mean/stddev
//! - `aggregate` - Per-package and combined statistics for one result
//! - `metrics` - Flop counts, power and MFlop/W
//! - `compare` - Metric layout across several results
//! - `report` - Text rendering of summaries and comparisons
//! - `shell` - Interactive browser state machine
//! - `config` - Layered TOML configuration
pub mod aggregate;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod measure;
pub mod metrics;
pub mod parser;
pub mod report;
pub mod shell;
pub mod stats;

pub use aggregate::{aggregate, analyze_files, ResultAverage};
pub use error::{AnalyzerError, ParseWarning, Result};
pub use measure::BenchResult;
pub use parser::LogParser;
