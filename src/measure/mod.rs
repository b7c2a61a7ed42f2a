//! Data model for parsed benchmark logs
//!
//! A [`BenchResult`] is one analyzed log file: the run header (threads,
//! iterations, array size) and the ordered list of [`Measure`] blocks, each
//! holding one [`PackageMeasure`] per CPU package that reported energy.

use crate::error::ParseWarning;
use serde::Serialize;
use std::fmt;

/// The phase a measure block was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MeasureKind {
    Idle,
    Map,
    Reduction,
    Stencil,
    /// `Initialize <name>` with a name the harness does not define
    Unknown,
}

impl MeasureKind {
    /// Map an algorithm name from an `Initialize` line
    pub fn from_algorithm(name: &str) -> Option<Self> {
        match name {
            "Map" => Some(Self::Map),
            "Reduction" => Some(Self::Reduction),
            "Stencil" => Some(Self::Stencil),
            _ => None,
        }
    }

    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    /// Whether the block feeds workload statistics
    ///
    /// Unrecognized blocks keep the default kind of the harness scripts and
    /// are pooled with the idle baseline.
    pub fn is_workload(self) -> bool {
        !matches!(self, Self::Idle | Self::Unknown)
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::metrics::measure_type_name(*self))
    }
}

/// RAPL energy-accounting zones reported by the harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnergyDomain {
    Package,
    Pp0,
    Pp1,
    Dram,
}

impl EnergyDomain {
    /// The optional domains, in report order
    pub const OPTIONAL: [EnergyDomain; 3] = [Self::Pp0, Self::Pp1, Self::Dram];

    /// Resolve the `KEY` part of a `KEY=valueJ` token
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "PKG" => Some(Self::Package),
            "PP0" => Some(Self::Pp0),
            "PP1" => Some(Self::Pp1),
            "DRAM" => Some(Self::Dram),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Package => "Pkg",
            Self::Pp0 => "PP0",
            Self::Pp1 => "PP1",
            Self::Dram => "DRAM",
        }
    }
}

/// Energy read from one package during one measurement window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageMeasure {
    pub package: u32,
    /// Whole-package energy in joules
    pub pkg: f64,
    pub pp0: Option<f64>,
    pub pp1: Option<f64>,
    pub dram: Option<f64>,
}

impl PackageMeasure {
    pub fn new(package: u32, pkg: f64) -> Self {
        Self {
            package,
            pkg,
            pp0: None,
            pp1: None,
            dram: None,
        }
    }

    /// Energy for a domain, `None` when the package did not report it
    pub fn domain(&self, domain: EnergyDomain) -> Option<f64> {
        match domain {
            EnergyDomain::Package => Some(self.pkg),
            EnergyDomain::Pp0 => self.pp0,
            EnergyDomain::Pp1 => self.pp1,
            EnergyDomain::Dram => self.dram,
        }
    }
}

/// One timed phase of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub kind: MeasureKind,
    /// Seconds; idle windows are fixed at one second
    pub execution_time: f64,
    /// Packages in the order they appear in the log
    pub packages: Vec<PackageMeasure>,
}

impl Measure {
    pub fn idle() -> Self {
        Self {
            kind: MeasureKind::Idle,
            execution_time: 1.0,
            packages: Vec::new(),
        }
    }

    pub fn workload(kind: MeasureKind) -> Self {
        Self {
            kind,
            execution_time: 0.0,
            packages: Vec::new(),
        }
    }
}

/// One analyzed log file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchResult {
    /// File stem, e.g. `O2-map-4t`
    pub file_name: String,
    pub threads: u32,
    pub iterations: u64,
    pub array_size: u64,
    pub measures: Vec<Measure>,
    pub warnings: Vec<ParseWarning>,
}

impl BenchResult {
    /// Optimization bucket encoded as the file name prefix
    pub fn optimization_level(&self) -> &str {
        crate::compare::optimization_level(&self.file_name)
    }

    /// Kind of the first workload measure
    pub fn algorithm(&self) -> Option<MeasureKind> {
        self.measures
            .iter()
            .map(|m| m.kind)
            .find(|kind| kind.is_workload())
    }
}
