//! Side-by-side comparison of results grouped by optimization bucket
//!
//! Log files are named `<bucket>-<algorithm>-<threads>...`, where the bucket
//! is a build variant such as `O0` or `O3`. Results are laid out with one
//! label per (algorithm, threads) pair and one series per bucket.

use crate::aggregate::ResultAverage;
use crate::error::{AnalyzerError, Result};
use crate::metrics;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Substring of a file stem before the first `-`
pub fn optimization_level(file_stem: &str) -> &str {
    file_stem.split('-').next().unwrap_or(file_stem)
}

/// Quantity compared across results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonMetric {
    /// Mean combined package energy (J)
    Energy,
    /// Mean execution time (s)
    Time,
    /// Mean power (J/s)
    Power,
    MflopsPerWatt,
}

impl ComparisonMetric {
    pub fn unit(self) -> &'static str {
        match self {
            Self::Energy => "J",
            Self::Time => "s",
            Self::Power => "J/s",
            Self::MflopsPerWatt => "MFlop/W",
        }
    }

    fn value(self, average: &ResultAverage<'_>) -> Result<f64> {
        match self {
            Self::Energy => average.all_package_average.pkg.mean(),
            Self::Time => average.execution_time.mean(),
            Self::Power => metrics::average_power(average),
            Self::MflopsPerWatt => metrics::mflops_per_watt(average),
        }
    }

    fn error(self, average: &ResultAverage<'_>) -> Result<Option<f64>> {
        match self {
            Self::Energy => average.all_package_average.pkg.stddev().map(Some),
            Self::Time => average.execution_time.stddev().map(Some),
            Self::Power | Self::MflopsPerWatt => Ok(None),
        }
    }
}

impl FromStr for ComparisonMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "energy" => Ok(Self::Energy),
            "time" => Ok(Self::Time),
            "j/s" | "power" => Ok(Self::Power),
            "mflops/w" | "mflops-per-watt" => Ok(Self::MflopsPerWatt),
            other => Err(format!(
                "unknown metric '{other}' (expected energy, time, j/s, mflops/w)"
            )),
        }
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Energy => "energy",
            Self::Time => "time",
            Self::Power => "j/s",
            Self::MflopsPerWatt => "mflops/w",
        };
        f.write_str(name)
    }
}

/// Values of one optimization bucket, aligned with [`Comparison::labels`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    /// Standard deviation per value, when the metric has one
    pub errors: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub metric: ComparisonMetric,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

fn workload_label(average: &ResultAverage<'_>) -> Result<String> {
    let base = average.base;
    let kind = base.algorithm().ok_or_else(|| AnalyzerError::NoWorkload {
        file: base.file_name.clone(),
    })?;
    Ok(format!("{} {}T", kind, base.threads))
}

/// Whether two results share the same algorithm and thread count
pub fn has_duplicates(averages: &[ResultAverage<'_>]) -> bool {
    let mut seen = HashSet::new();
    averages
        .iter()
        .any(|a| !seen.insert((a.base.algorithm(), a.base.threads)))
}

/// Lay out a metric for several results
///
/// When results repeat an (algorithm, threads) pair they are split into one
/// series per optimization bucket; otherwise every result becomes its own
/// label in a single series carrying error bars.
pub fn compare(averages: &[ResultAverage<'_>], metric: ComparisonMetric) -> Result<Comparison> {
    if has_duplicates(averages) {
        compare_by_bucket(averages, metric)
    } else {
        compare_flat(averages, metric)
    }
}

fn compare_flat(averages: &[ResultAverage<'_>], metric: ComparisonMetric) -> Result<Comparison> {
    let mut labels = Vec::with_capacity(averages.len());
    let mut values = Vec::with_capacity(averages.len());
    let mut errors = Vec::with_capacity(averages.len());

    for average in averages {
        labels.push(workload_label(average)?);
        values.push(metric.value(average)?);
        if let Some(error) = metric.error(average)? {
            errors.push(error);
        }
    }

    let errors = (errors.len() == values.len() && !values.is_empty()).then_some(errors);
    Ok(Comparison {
        metric,
        labels,
        series: vec![Series {
            name: metric.to_string(),
            values,
            errors,
        }],
    })
}

fn compare_by_bucket(averages: &[ResultAverage<'_>], metric: ComparisonMetric) -> Result<Comparison> {
    let mut labels: Vec<String> = Vec::new();
    for average in averages {
        let label = workload_label(average)?;
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    let mut series: Vec<Series> = Vec::new();
    for average in averages {
        let bucket = average.base.optimization_level();
        let index = match series.iter().position(|s| s.name == bucket) {
            Some(index) => index,
            None => {
                series.push(Series {
                    name: bucket.to_string(),
                    values: vec![0.0; labels.len()],
                    errors: None,
                });
                series.len() - 1
            }
        };

        let label = workload_label(average)?;
        let column = labels
            .iter()
            .position(|l| *l == label)
            .unwrap_or_default();
        series[index].values[column] = metric.value(average)?;
    }

    Ok(Comparison {
        metric,
        labels,
        series,
    })
}
