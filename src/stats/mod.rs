//! Append-only sample accumulator with summary statistics
//!
//! Samples are rounded to four decimals when added, and every derived
//! statistic is rounded again when computed. Results therefore match the
//! compounded rounding of the reports produced by the harness scripts.

use crate::error::{AnalyzerError, Result};
use serde::Serialize;

/// z-score for a two-sided 95% confidence interval
const Z_95: f64 = 1.96;

/// Round to four decimal digits, sending exact ties to the even digit
///
/// Formatting rounds the exact binary value, so no scaling error creeps in.
pub fn round4(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

/// Ordered collection of samples; duplicates are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatAccumulator {
    values: Vec<f64>,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.values.push(round4(value));
    }

    /// Samples in insertion order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, statistic: &'static str) -> Result<&[f64]> {
        if self.values.is_empty() {
            return Err(AnalyzerError::EmptyAccumulator { statistic });
        }
        Ok(&self.values)
    }

    pub fn min(&self) -> Result<f64> {
        let values = self.require("min")?;
        Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self) -> Result<f64> {
        let values = self.require("max")?;
        Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn mean(&self) -> Result<f64> {
        let values = self.require("mean")?;
        let total: f64 = values.iter().sum();
        Ok(round4(total / values.len() as f64))
    }

    /// Population standard deviation around the rounded mean
    pub fn stddev(&self) -> Result<f64> {
        let values = self.require("stddev")?;
        let mean = self.mean()?;
        let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Ok(round4((squares / values.len() as f64).sqrt()))
    }

    /// Standard error of the mean
    pub fn stderr(&self) -> Result<f64> {
        let values = self.require("stderr")?;
        Ok(round4(self.stddev()? / (values.len() as f64).sqrt()))
    }

    /// Half-width of the 95% confidence interval
    pub fn ci95(&self) -> Result<f64> {
        Ok(round4(Z_95 * self.stderr()?))
    }

    pub fn summary(&self) -> Result<StatSummary> {
        Ok(StatSummary {
            count: self.len(),
            min: self.min()?,
            max: self.max()?,
            mean: self.mean()?,
            stddev: self.stddev()?,
            stderr: self.stderr()?,
            ci95: self.ci95()?,
        })
    }
}

impl FromIterator<f64> for StatAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut accumulator = Self::new();
        for value in iter {
            accumulator.add(value);
        }
        accumulator
    }
}

/// Snapshot of every statistic of an accumulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
    pub stderr: f64,
    pub ci95: f64,
}
