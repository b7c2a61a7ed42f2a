//! Line templates printed by the benchmark harness
//!
//! The harness writes fixed Portuguese/English status sentences. Each
//! pattern is anchored at the start of the line; anything that matches none
//! of them is ignored by the parser.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid log line pattern")
}

/// `Tamanho do array alterado para 100x100`
pub(super) static ARRAY_SIZE: Lazy<Regex> =
    Lazy::new(|| compile(r"^Tamanho do array alterado para (?P<size>\d+)x\d+"));

/// `Quantidade maxima de threads alterada para 4` or
/// `Quantidade maxima de threads inicial: 8`
pub(super) static THREADS: Lazy<Regex> = Lazy::new(|| {
    compile(r"^Quantidade maxima de threads (?P<mode>alterada para|inicial:) (?P<threads>\S+)")
});

/// `Quantidade de iteracoes alterado para 5000`
pub(super) static ITERATIONS: Lazy<Regex> =
    Lazy::new(|| compile(r"^Quantidade de iteracoes alterado para (?P<iterations>\S+)"));

/// `Measuring idle (1s)`
pub(super) static IDLE: Lazy<Regex> = Lazy::new(|| compile(r"^Measuring idle"));

/// `Initialize Map (100x100 array)`
pub(super) static INITIALIZE: Lazy<Regex> =
    Lazy::new(|| compile(r"^Initialize (?P<name>\S+)"));

/// `Execution time: 0.532s`
pub(super) static EXECUTION_TIME: Lazy<Regex> =
    Lazy::new(|| compile(r"^Execution time: (?P<seconds>\S+?)s\s*$"));

/// `Package 0: PKG=12.5J, PP0=8.1J, DRAM=1.2J`
pub(super) static PACKAGE: Lazy<Regex> =
    Lazy::new(|| compile(r"^Package (?P<package>\S+?):(?P<readings>.*)$"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_template_modes() {
        let caps = THREADS
            .captures("Quantidade maxima de threads alterada para 4")
            .unwrap();
        assert_eq!(&caps["mode"], "alterada para");
        assert_eq!(&caps["threads"], "4");

        let caps = THREADS
            .captures("Quantidade maxima de threads inicial: 16")
            .unwrap();
        assert_eq!(&caps["mode"], "inicial:");
        assert_eq!(&caps["threads"], "16");
    }

    #[test]
    fn test_execution_time_strips_unit() {
        let caps = EXECUTION_TIME.captures("Execution time: 1.5e-05s").unwrap();
        assert_eq!(&caps["seconds"], "1.5e-05");
        assert!(EXECUTION_TIME.captures("Execute Map").is_none());
    }

    #[test]
    fn test_package_template() {
        let caps = PACKAGE
            .captures("Package 12: PKG=3.5J, PP0=1J")
            .unwrap();
        assert_eq!(&caps["package"], "12");
        assert_eq!(caps["readings"].trim(), "PKG=3.5J, PP0=1J");
    }

    #[test]
    fn test_array_size_takes_first_dimension() {
        let caps = ARRAY_SIZE
            .captures("Tamanho do array alterado para 2000x2000")
            .unwrap();
        assert_eq!(&caps["size"], "2000");
    }
}
