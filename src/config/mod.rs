//! Layered configuration for the analyzer
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. Global config file (`<config dir>/rapl-report/config.toml`)
//! 3. Project file `rapl-report.toml` in the working directory
//! 4. File passed with `--config`
//! 5. `RAPL_REPORT_LOG` environment variable for the log level
//!
//! Later files replace whole values of earlier ones; missing files are
//! skipped.

use crate::error::{AnalyzerError, Result};
use crate::parser::ParserSettings;
use crate::report::ReportSettings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PROJECT_CONFIG_FILE: &str = "rapl-report.toml";
pub const LOG_LEVEL_ENV: &str = "RAPL_REPORT_LOG";

/// Valid log levels for `log_level`
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Tracing level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
    /// Directory holding one sub-folder of logs per experiment
    pub results_dir: PathBuf,
    pub parser: ParserSettings,
    pub report: ReportSettings,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            results_dir: PathBuf::from("."),
            parser: ParserSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

/// Same shape as [`AnalyzerConfig`] with every value optional, so a file
/// only overrides what it sets
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    log_level: Option<String>,
    results_dir: Option<PathBuf>,
    parser: Option<ParserSettings>,
    report: Option<ReportSettings>,
}

/// Location of the per-user config file
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rapl-report").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl AnalyzerConfig {
    /// Load every layer using the real environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut files: Vec<PathBuf> = global_config_path().into_iter().collect();
        files.push(PathBuf::from(PROJECT_CONFIG_FILE));

        let mut config = Self::from_files(&files, explicit)?;
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            config.log_level = Some(level);
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply optional `files` then a required `explicit` file over defaults
    pub fn from_files(files: &[PathBuf], explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        for path in files {
            if path.is_file() {
                config.apply(read_layer(path)?);
            }
        }
        if let Some(path) = explicit {
            config.apply(read_layer(path)?);
        }
        Ok(config)
    }

    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(level) = layer.log_level {
            self.log_level = Some(level);
        }
        if let Some(dir) = layer.results_dir {
            self.results_dir = dir;
        }
        if let Some(parser) = layer.parser {
            self.parser = parser;
        }
        if let Some(report) = layer.report {
            self.report = report;
        }
    }

    fn validate(&self) -> Result<()> {
        match &self.log_level {
            Some(level) if !VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) => {
                Err(AnalyzerError::config(
                    LOG_LEVEL_ENV,
                    format!(
                        "invalid log level '{level}', expected one of {}",
                        VALID_LOG_LEVELS.join(", ")
                    ),
                ))
            }
            _ => Ok(()),
        }
    }
}

fn read_layer(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
    debug!("Loaded config from {}", path.display());
    toml::from_str(&content).map_err(|e| AnalyzerError::config(path, e))
}
