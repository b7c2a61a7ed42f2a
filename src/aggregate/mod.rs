//! Aggregation of a parsed log into per-package energy and time statistics
//!
//! Idle windows are pooled into a single baseline accumulator across every
//! package. Workload windows feed three views: execution time, one
//! accumulator per physical package, and a combined view where each sample
//! is the sum over all packages of one window.

use crate::error::Result;
use crate::measure::{BenchResult, EnergyDomain, PackageMeasure};
use crate::parser::LogParser;
use crate::stats::StatAccumulator;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Identity of a package accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackageId {
    Physical(u32),
    /// Samples pooled or summed over every package
    Combined,
}

/// Energy statistics for one package, or for all of them combined
///
/// Optional domains start absent and become present the first time a
/// contributing sample reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageAverage {
    pub package: PackageId,
    pub pkg: StatAccumulator,
    pub pp0: Option<StatAccumulator>,
    pub pp1: Option<StatAccumulator>,
    pub dram: Option<StatAccumulator>,
}

impl PackageAverage {
    pub fn new(package: PackageId) -> Self {
        Self {
            package,
            pkg: StatAccumulator::new(),
            pp0: None,
            pp1: None,
            dram: None,
        }
    }

    pub fn domain(&self, domain: EnergyDomain) -> Option<&StatAccumulator> {
        match domain {
            EnergyDomain::Package => Some(&self.pkg),
            EnergyDomain::Pp0 => self.pp0.as_ref(),
            EnergyDomain::Pp1 => self.pp1.as_ref(),
            EnergyDomain::Dram => self.dram.as_ref(),
        }
    }

    /// Accumulator for an optional domain, created on first use
    fn domain_mut(&mut self, domain: EnergyDomain) -> &mut StatAccumulator {
        let slot = match domain {
            EnergyDomain::Package => return &mut self.pkg,
            EnergyDomain::Pp0 => &mut self.pp0,
            EnergyDomain::Pp1 => &mut self.pp1,
            EnergyDomain::Dram => &mut self.dram,
        };
        slot.get_or_insert_with(StatAccumulator::new)
    }

    /// Add one package reading
    pub fn merge(&mut self, measure: &PackageMeasure) {
        self.pkg.add(measure.pkg);
        for domain in EnergyDomain::OPTIONAL {
            if let Some(value) = measure.domain(domain) {
                self.domain_mut(domain).add(value);
            }
        }
    }

    /// Add the sum over a set of readings taken in the same window
    ///
    /// An optional domain is summed when at least one reading reports it,
    /// counting absent readings as zero.
    pub fn merge_combined(&mut self, measures: &[PackageMeasure]) {
        self.pkg.add(measures.iter().map(|m| m.pkg).sum());
        for domain in EnergyDomain::OPTIONAL {
            if measures.iter().any(|m| m.domain(domain).is_some()) {
                let total: f64 = measures
                    .iter()
                    .map(|m| m.domain(domain).unwrap_or(0.0))
                    .sum();
                self.domain_mut(domain).add(total);
            }
        }
    }
}

/// Statistics computed from one [`BenchResult`]
#[derive(Debug, Clone, Serialize)]
pub struct ResultAverage<'a> {
    #[serde(skip)]
    pub base: &'a BenchResult,
    /// Execution times of workload measures
    pub execution_time: StatAccumulator,
    /// Idle baseline pooled over every idle window and package
    pub idle_average: PackageAverage,
    /// Packages with workload readings, ascending by package number
    pub package_averages: Vec<PackageAverage>,
    pub all_package_average: PackageAverage,
}

impl ResultAverage<'_> {
    /// `(execution time, combined package energy)` for each workload run
    pub fn energy_time_points(&self) -> Vec<(f64, f64)> {
        self.execution_time
            .values()
            .iter()
            .copied()
            .zip(self.all_package_average.pkg.values().iter().copied())
            .collect()
    }
}

/// Roll a parsed log into summary accumulators
///
/// Blocks with an unrecognized algorithm are pooled with the idle baseline.
pub fn aggregate(result: &BenchResult) -> ResultAverage<'_> {
    let mut execution_time = StatAccumulator::new();
    let mut idle_average = PackageAverage::new(PackageId::Combined);
    let mut all_package_average = PackageAverage::new(PackageId::Combined);
    let mut packages: BTreeMap<u32, PackageAverage> = BTreeMap::new();

    for measure in &result.measures {
        if !measure.kind.is_workload() {
            for package in &measure.packages {
                idle_average.merge(package);
            }
            continue;
        }

        execution_time.add(measure.execution_time);
        all_package_average.merge_combined(&measure.packages);
        for package in &measure.packages {
            packages
                .entry(package.package)
                .or_insert_with(|| PackageAverage::new(PackageId::Physical(package.package)))
                .merge(package);
        }
    }

    debug!(
        file = %result.file_name,
        packages = packages.len(),
        runs = execution_time.len(),
        "Aggregated result"
    );
    ResultAverage {
        base: result,
        execution_time,
        idle_average,
        package_averages: packages.into_values().collect(),
        all_package_average,
    }
}

/// Parse several logs in order
///
/// Each entry holds the outcome for the path at the same position; a file
/// that fails to parse does not affect the others.
pub fn analyze_files<P: AsRef<Path>>(parser: &LogParser, paths: &[P]) -> Vec<Result<BenchResult>> {
    paths
        .iter()
        .map(|path| parser.parse_file(path.as_ref()))
        .collect()
}
