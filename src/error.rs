use std::path::PathBuf;
use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors raised to the caller of a parse, aggregation or report call
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The log file could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A derived statistic was requested from an accumulator with no samples
    #[error("Cannot compute {statistic}: accumulator has no samples")]
    EmptyAccumulator { statistic: &'static str },

    /// A rate metric was requested while the mean execution time is zero
    #[error("Mean execution time is zero, rate metrics are undefined")]
    ZeroExecutionTime,

    /// An efficiency metric was requested while the mean energy is zero
    #[error("Mean package energy is zero, efficiency is undefined")]
    ZeroEnergy,

    /// The result holds only idle measures
    #[error("No workload measure found in {file}")]
    NoWorkload { file: String },

    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("{0}")]
    Shell(String),
}

impl AnalyzerError {
    /// Create an I/O error tied to the file that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Non-fatal problems found while parsing a log
///
/// These are logged and collected on the parsed result; parsing continues.
#[derive(Error, Debug, Clone, PartialEq, serde::Serialize)]
pub enum ParseWarning {
    #[error("line {line}: unknown algorithm '{name}'")]
    UnknownAlgorithm { line: usize, name: String },

    #[error("line {line}: unknown RAPL domain '{token}'")]
    UnknownDomain { line: usize, token: String },

    #[error("line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: package {package} has no PKG energy")]
    MissingPackageEnergy { line: usize, package: u32 },

    #[error("line {line}: no open measure for '{text}'")]
    OrphanLine { line: usize, text: String },
}
