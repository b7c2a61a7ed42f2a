//! Derived metrics: flop model per algorithm and energy efficiency

use crate::aggregate::ResultAverage;
use crate::error::{AnalyzerError, Result};
use crate::measure::MeasureKind;

const FLOPS_PER_MEGAFLOP: f64 = 1_000_000.0;

/// Display name for a measure kind
pub fn measure_type_name(kind: MeasureKind) -> &'static str {
    match kind {
        MeasureKind::Idle => "Idle",
        MeasureKind::Map => "Map",
        MeasureKind::Reduction => "Reduction",
        MeasureKind::Stencil => "Stencil",
        MeasureKind::Unknown => "Unknown",
    }
}

/// Floating-point operations per array element per iteration
fn flops_per_element(kind: MeasureKind) -> u64 {
    match kind {
        // one mul, one add
        MeasureKind::Map => 2,
        MeasureKind::Reduction => 1,
        // three adds, one div
        MeasureKind::Stencil => 4,
        MeasureKind::Idle | MeasureKind::Unknown => 0,
    }
}

/// Total flop count of one full run over an `array_size`² array
pub fn measure_type_flops(kind: MeasureKind, array_size: u64, iterations: u64) -> u64 {
    array_size
        .saturating_mul(array_size)
        .saturating_mul(iterations)
        .saturating_mul(flops_per_element(kind))
}

fn mean_execution_time(average: &ResultAverage<'_>) -> Result<f64> {
    let seconds = average.execution_time.mean()?;
    if seconds == 0.0 {
        return Err(AnalyzerError::ZeroExecutionTime);
    }
    Ok(seconds)
}

/// Mean power over all packages in watts (J/s)
pub fn average_power(average: &ResultAverage<'_>) -> Result<f64> {
    let seconds = mean_execution_time(average)?;
    Ok(average.all_package_average.pkg.mean()? / seconds)
}

/// Energy efficiency in MFlops per watt
///
/// Computed as MFlops/s divided by J/s, both normalized by the mean
/// execution time.
pub fn mflops_per_watt(average: &ResultAverage<'_>) -> Result<f64> {
    let base = average.base;
    let kind = base.algorithm().ok_or_else(|| AnalyzerError::NoWorkload {
        file: base.file_name.clone(),
    })?;
    let seconds = mean_execution_time(average)?;
    let energy = average.all_package_average.pkg.mean()?;
    if energy == 0.0 {
        return Err(AnalyzerError::ZeroEnergy);
    }

    let flops = measure_type_flops(kind, base.array_size, base.iterations) as f64 / seconds;
    let mflops = flops / FLOPS_PER_MEGAFLOP;
    let watts = energy / seconds;
    Ok(mflops / watts)
}
