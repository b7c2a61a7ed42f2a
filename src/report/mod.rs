//! Plain-text reports for aggregated results

use crate::aggregate::{PackageAverage, PackageId, ResultAverage};
use crate::compare::Comparison;
use crate::error::{AnalyzerError, Result};
use crate::measure::EnergyDomain;
use crate::stats::StatAccumulator;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Report rendering options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Also print standard error and the 95% confidence interval
    pub show_confidence: bool,
}

const BRANCH: &str = "┣━━ ";
const LAST: &str = "┗━━ ";
const PIPE: &str = "┃   ";
const SPACE: &str = "    ";

fn child_prefix(prefix: &str, last: bool) -> String {
    format!("{prefix}{}", if last { SPACE } else { PIPE })
}

fn connector(last: bool) -> &'static str {
    if last {
        LAST
    } else {
        BRANCH
    }
}

/// Always shows a fractional digit, as in `5.0J`
fn number(value: f64) -> String {
    format!("{value:?}")
}

fn write_stats(
    out: &mut String,
    prefix: &str,
    values: &StatAccumulator,
    unit: &str,
    settings: &ReportSettings,
) -> Result<()> {
    let mut rows = vec![
        ("Min:   ", number(values.min()?)),
        ("Max:   ", number(values.max()?)),
        ("Avg:   ", number(values.mean()?)),
        ("StdDev:", number(values.stddev()?)),
    ];
    if settings.show_confidence {
        rows.push(("StdErr:", number(values.stderr()?)));
        rows.push((
            "95% CI:",
            format!("{} ± {}", number(values.mean()?), number(values.ci95()?)),
        ));
    }

    let count = rows.len();
    for (index, (name, value)) in rows.into_iter().enumerate() {
        let _ = writeln!(
            out,
            "{prefix}{}{name} {value}{unit}",
            connector(index + 1 == count)
        );
    }
    Ok(())
}

fn write_package(
    out: &mut String,
    title: &str,
    average: &PackageAverage,
    last: bool,
    settings: &ReportSettings,
) -> Result<()> {
    let _ = writeln!(out, "{}{title}:", connector(last));
    let prefix = child_prefix("", last);

    let domains: Vec<(EnergyDomain, &StatAccumulator)> = [EnergyDomain::Package]
        .into_iter()
        .chain(EnergyDomain::OPTIONAL)
        .filter_map(|domain| average.domain(domain).map(|acc| (domain, acc)))
        .collect();

    let count = domains.len();
    for (index, (domain, values)) in domains.into_iter().enumerate() {
        let domain_last = index + 1 == count;
        let _ = writeln!(out, "{prefix}{}{}:", connector(domain_last), domain.label());
        write_stats(
            out,
            &child_prefix(&prefix, domain_last),
            values,
            "J",
            settings,
        )?;
    }
    Ok(())
}

/// Tree-formatted summary of one result
pub fn render_summary(average: &ResultAverage<'_>, settings: &ReportSettings) -> Result<String> {
    let base = average.base;
    let algorithm = base.algorithm().ok_or_else(|| AnalyzerError::NoWorkload {
        file: base.file_name.clone(),
    })?;

    let mut out = String::new();
    let _ = writeln!(out, "Algorithm: {algorithm}");
    let _ = writeln!(out, "Threads: {}", base.threads);
    let _ = writeln!(out, "Execution time (s):");
    write_stats(&mut out, "", &average.execution_time, "s", settings)?;
    let _ = writeln!(out, "Energy (J):");

    let mut sections: Vec<(String, &PackageAverage)> = Vec::new();
    if !average.idle_average.pkg.is_empty() {
        sections.push(("Idle".to_string(), &average.idle_average));
    }
    sections.push(("All".to_string(), &average.all_package_average));
    for package in &average.package_averages {
        if let (PackageId::Physical(n), false) = (package.package, package.pkg.is_empty()) {
            sections.push((format!("Package {n}"), package));
        }
    }

    let count = sections.len();
    for (index, (title, package)) in sections.into_iter().enumerate() {
        write_package(&mut out, &title, package, index + 1 == count, settings)?;
    }
    Ok(out)
}

/// Aligned table with one row per label and one column per series
pub fn render_comparison(comparison: &Comparison) -> String {
    let label_width = comparison
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max("Test".len());
    let columns: Vec<String> = comparison
        .series
        .iter()
        .map(|s| format!("{} ({})", s.name, comparison.metric.unit()))
        .collect();
    let widths: Vec<usize> = columns.iter().map(|c| c.chars().count().max(12)).collect();

    let mut out = String::new();
    let _ = write!(out, "{:<label_width$}", "Test");
    for (column, width) in columns.iter().zip(&widths) {
        let _ = write!(out, "  {column:>width$}");
    }
    out.push('\n');

    for (row, label) in comparison.labels.iter().enumerate() {
        let _ = write!(out, "{label:<label_width$}");
        for (series, width) in comparison.series.iter().zip(&widths) {
            let cell = match (series.values.get(row), &series.errors) {
                (Some(value), Some(errors)) => {
                    format!("{value:.2} ± {:.2}", errors.get(row).copied().unwrap_or(0.0))
                }
                (Some(value), None) => format!("{value:.2}"),
                (None, _) => String::new(),
            };
            let _ = write!(out, "  {cell:>width$}");
        }
        out.push('\n');
    }
    out
}
