//! Line-oriented parser for benchmark harness logs
//!
//! A log is a sequence of status lines. Header lines set the run parameters,
//! `Measuring idle`/`Initialize` lines open a measure block, execution-time
//! and package lines fill it, and a blank line commits it.
//!
//! ```text
//! Tamanho do array alterado para 100x100
//! Quantidade maxima de threads alterada para 4
//!
//! Measuring idle (1s)
//! Package 0: PKG=5.2J, PP0=1.1J
//!
//! Initialize Map (100x100 array)
//! Execute Map
//! Execution time: 0.5s
//! Package 0: PKG=3J, PP0=2J
//! Clean Map
//!
//! ```

mod templates;

use crate::error::{AnalyzerError, ParseWarning, Result};
use crate::measure::{BenchResult, EnergyDomain, Measure, MeasureKind, PackageMeasure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Parser behavior switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Commit a measure left open at end of file instead of dropping it
    pub commit_trailing_measure: bool,
}

/// Converts harness logs into [`BenchResult`]s
#[derive(Debug, Clone, Default)]
pub struct LogParser {
    settings: ParserSettings,
}

impl LogParser {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }

    /// Read and parse a log file
    ///
    /// The file is decoded as Latin-1 so raw bytes from the harness never
    /// fail decoding. The result is named after the file stem.
    pub fn parse_file(&self, path: &Path) -> Result<BenchResult> {
        let bytes = fs::read(path).map_err(|e| AnalyzerError::io(path, e))?;
        let text = decode_latin1(&bytes);
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!("Parsing {} ({} bytes)", path.display(), bytes.len());
        Ok(self.parse_str(&name, &text))
    }

    /// Parse log text already in memory
    pub fn parse_str(&self, name: &str, text: &str) -> BenchResult {
        let mut state = ParseState::new(name);
        for (index, line) in text.lines().enumerate() {
            state.line(index + 1, line);
        }
        state.finish(&self.settings)
    }
}

/// Map each byte to the code point of the same value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

struct ParseState {
    result: BenchResult,
    current: Option<Measure>,
    explicit_threads: bool,
}

impl ParseState {
    fn new(name: &str) -> Self {
        Self {
            result: BenchResult {
                file_name: name.to_string(),
                ..Default::default()
            },
            current: None,
            explicit_threads: false,
        }
    }

    fn warn(&mut self, warning: ParseWarning) {
        warn!("{}: {}", self.result.file_name, warning);
        self.result.warnings.push(warning);
    }

    fn number<T: FromStr>(&mut self, line: usize, value: &str) -> Option<T> {
        match value.parse() {
            Ok(number) => Some(number),
            Err(_) => {
                self.warn(ParseWarning::InvalidNumber {
                    line,
                    value: value.to_string(),
                });
                None
            }
        }
    }

    fn line(&mut self, number: usize, line: &str) {
        if line.trim().is_empty() {
            self.commit();
            return;
        }

        if let Some(caps) = templates::ARRAY_SIZE.captures(line) {
            if let Some(size) = self.number(number, &caps["size"]) {
                self.result.array_size = size;
            }
        } else if let Some(caps) = templates::THREADS.captures(line) {
            let explicit = &caps["mode"] == "alterada para";
            if explicit || !self.explicit_threads {
                if let Some(threads) = self.number(number, &caps["threads"]) {
                    self.result.threads = threads;
                    self.explicit_threads |= explicit;
                }
            }
        } else if let Some(caps) = templates::ITERATIONS.captures(line) {
            if let Some(iterations) = self.number(number, &caps["iterations"]) {
                self.result.iterations = iterations;
            }
        } else if templates::IDLE.is_match(line) {
            self.open(Measure::idle());
        } else if let Some(caps) = templates::INITIALIZE.captures(line) {
            let name = &caps["name"];
            let kind = match MeasureKind::from_algorithm(name) {
                Some(kind) => kind,
                None => {
                    self.warn(ParseWarning::UnknownAlgorithm {
                        line: number,
                        name: name.to_string(),
                    });
                    MeasureKind::Unknown
                }
            };
            self.open(Measure::workload(kind));
        } else if let Some(caps) = templates::EXECUTION_TIME.captures(line) {
            if self.current.is_none() {
                self.orphan(number, line);
                return;
            }
            let seconds: Option<f64> = self.number(number, &caps["seconds"]);
            if let (Some(measure), Some(seconds)) = (self.current.as_mut(), seconds) {
                measure.execution_time = seconds;
            }
        } else if let Some(caps) = templates::PACKAGE.captures(line) {
            if self.current.is_none() {
                self.orphan(number, line);
                return;
            }
            let package = self.package(number, &caps["package"], &caps["readings"]);
            if let (Some(measure), Some(package)) = (self.current.as_mut(), package) {
                measure.packages.push(package);
            }
        } else {
            trace!(line = number, "Ignoring line: {}", line);
        }
    }

    /// Parse `PKG=xJ, PP0=yJ, ...` readings for one package
    fn package(&mut self, line: usize, package: &str, readings: &str) -> Option<PackageMeasure> {
        let package: u32 = self.number(line, package)?;
        let mut pkg = None;
        let mut measure = PackageMeasure::new(package, 0.0);

        for token in readings.split_whitespace() {
            let token = token.trim_end_matches(',');
            let Some((key, value)) = token.split_once('=') else {
                self.warn(ParseWarning::UnknownDomain {
                    line,
                    token: token.to_string(),
                });
                continue;
            };
            let Some(domain) = EnergyDomain::from_prefix(key) else {
                self.warn(ParseWarning::UnknownDomain {
                    line,
                    token: token.to_string(),
                });
                continue;
            };
            let value = value.strip_suffix('J').unwrap_or(value);
            let Some(joules) = self.number::<f64>(line, value) else {
                continue;
            };
            match domain {
                EnergyDomain::Package => pkg = Some(joules),
                EnergyDomain::Pp0 => measure.pp0 = Some(joules),
                EnergyDomain::Pp1 => measure.pp1 = Some(joules),
                EnergyDomain::Dram => measure.dram = Some(joules),
            }
        }

        match pkg {
            Some(joules) => {
                measure.pkg = joules;
                Some(measure)
            }
            None => {
                self.warn(ParseWarning::MissingPackageEnergy { line, package });
                None
            }
        }
    }

    fn orphan(&mut self, line: usize, text: &str) {
        self.warn(ParseWarning::OrphanLine {
            line,
            text: text.to_string(),
        });
    }

    /// Start a block; one still open without its blank line is dropped
    fn open(&mut self, measure: Measure) {
        if let Some(previous) = self.current.replace(measure) {
            debug!(
                "{}: discarding unterminated {} measure",
                self.result.file_name, previous.kind
            );
        }
    }

    fn commit(&mut self) {
        if let Some(measure) = self.current.take() {
            trace!(kind = %measure.kind, packages = measure.packages.len(), "Committed measure");
            self.result.measures.push(measure);
        }
    }

    fn finish(mut self, settings: &ParserSettings) -> BenchResult {
        if settings.commit_trailing_measure {
            self.commit();
        } else if let Some(measure) = &self.current {
            debug!(
                "{}: dropping {} measure without terminating blank line",
                self.result.file_name, measure.kind
            );
        }
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_LOG: &str = "\
Saida alterada para O2-map-4t.log

Quantidade maxima de threads alterada para 4

Tamanho do array alterado para 8x8

Quantidade de iteracoes alterado para 10

Measuring idle (1s)
Package 0: PKG=5J

Initialize Map (8x8 array)
Execute Map
Execution time: 0.5s
Package 0: PKG=3J
Clean Map

";

    fn parse(text: &str) -> BenchResult {
        LogParser::default().parse_str("test", text)
    }

    #[test]
    fn test_parse_header_and_measures() {
        let result = parse(MAP_LOG);
        assert_eq!(result.threads, 4);
        assert_eq!(result.iterations, 10);
        assert_eq!(result.array_size, 8);
        assert_eq!(result.measures.len(), 2);

        let idle = &result.measures[0];
        assert_eq!(idle.kind, MeasureKind::Idle);
        assert_eq!(idle.execution_time, 1.0);
        assert_eq!(idle.packages, vec![PackageMeasure::new(0, 5.0)]);

        let map = &result.measures[1];
        assert_eq!(map.kind, MeasureKind::Map);
        assert_eq!(map.execution_time, 0.5);
        assert_eq!(map.packages, vec![PackageMeasure::new(0, 3.0)]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unset_header_defaults_to_zero() {
        let result = parse("Measuring idle (1s)\nPackage 0: PKG=1J\n\n");
        assert_eq!(result.threads, 0);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.array_size, 0);
        assert_eq!(result.measures.len(), 1);
    }

    #[test]
    fn test_all_domains_and_multiple_packages() {
        let result = parse(
            "Initialize Stencil (10x10 array)\n\
             Execution time: 2.25s\n\
             Package 0: PKG=10.5J, PP0=6J, PP1=0.5J, DRAM=2J\n\
             Package 1: PKG=9J, DRAM=1.75J\n\
             \n",
        );
        let measure = &result.measures[0];
        assert_eq!(measure.kind, MeasureKind::Stencil);
        assert_eq!(measure.execution_time, 2.25);
        assert_eq!(
            measure.packages[0],
            PackageMeasure {
                package: 0,
                pkg: 10.5,
                pp0: Some(6.0),
                pp1: Some(0.5),
                dram: Some(2.0),
            }
        );
        assert_eq!(measure.packages[1].package, 1);
        assert_eq!(measure.packages[1].pp0, None);
        assert_eq!(measure.packages[1].dram, Some(1.75));
    }

    #[test]
    fn test_multi_digit_package_number() {
        let result = parse("Measuring idle (1s)\nPackage 12: PKG=1J\n\n");
        assert_eq!(result.measures[0].packages[0].package, 12);
    }

    #[test]
    fn test_unknown_algorithm_warns_and_continues() {
        let result = parse("Initialize Scan (8x8 array)\nExecution time: 1s\nPackage 0: PKG=2J\n\n");
        assert_eq!(result.measures.len(), 1);
        assert_eq!(result.measures[0].kind, MeasureKind::Unknown);
        assert_eq!(
            result.warnings,
            vec![ParseWarning::UnknownAlgorithm {
                line: 1,
                name: "Scan".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_domain_is_skipped() {
        let result = parse("Measuring idle (1s)\nPackage 0: PKG=4J, PSYS=9J\n\n");
        let package = &result.measures[0].packages[0];
        assert_eq!(package.pkg, 4.0);
        assert_eq!(
            result.warnings,
            vec![ParseWarning::UnknownDomain {
                line: 2,
                token: "PSYS=9J".to_string()
            }]
        );
    }

    #[test]
    fn test_package_without_pkg_is_dropped() {
        let result = parse("Measuring idle (1s)\nPackage 0: PP0=4J\n\n");
        assert!(result.measures[0].packages.is_empty());
        assert!(matches!(
            result.warnings[0],
            ParseWarning::MissingPackageEnergy { line: 2, package: 0 }
        ));
    }

    #[test]
    fn test_orphan_lines_are_reported() {
        let result = parse("Execution time: 1s\nPackage 0: PKG=1J\n");
        assert!(result.measures.is_empty());
        assert_eq!(result.warnings.len(), 2);
        assert!(result
            .warnings
            .iter()
            .all(|w| matches!(w, ParseWarning::OrphanLine { .. })));
    }

    #[test]
    fn test_trailing_measure_is_dropped() {
        let text = "Measuring idle (1s)\nPackage 0: PKG=1J\n\nInitialize Map (8x8 array)\nExecution time: 1s\nPackage 0: PKG=2J";
        let result = parse(text);
        assert_eq!(result.measures.len(), 1);

        let strict = LogParser::new(ParserSettings {
            commit_trailing_measure: true,
        });
        let result = strict.parse_str("test", text);
        assert_eq!(result.measures.len(), 2);
        assert_eq!(result.measures[1].kind, MeasureKind::Map);
    }

    #[test]
    fn test_unterminated_block_is_replaced_by_next_block() {
        let text = "Initialize Map (8x8 array)\n\
                    Execution time: 1s\n\
                    Package 0: PKG=2J\n\
                    Initialize Reduction (8x8 array)\n\
                    Execution time: 0.5s\n\
                    Package 0: PKG=1J\n\
                    \n";
        let result = parse(text);
        assert_eq!(result.measures.len(), 1);
        assert_eq!(result.measures[0].kind, MeasureKind::Reduction);
        assert_eq!(result.measures[0].execution_time, 0.5);
        assert_eq!(result.measures[0].packages, vec![PackageMeasure::new(0, 1.0)]);
        assert!(result.warnings.is_empty());

        // keeping the trailing block does not rescue a replaced one
        let strict = LogParser::new(ParserSettings {
            commit_trailing_measure: true,
        });
        assert_eq!(strict.parse_str("test", text).measures.len(), 1);
    }

    #[test]
    fn test_huge_package_number_is_kept_as_is() {
        let result = parse("Measuring idle (1s)\nPackage 4000000000: PKG=1J\n\n");
        assert_eq!(result.measures[0].packages[0].package, 4_000_000_000);

        let average = crate::aggregate::aggregate(&result);
        assert!(average.package_averages.is_empty());
        assert_eq!(average.idle_average.pkg.values(), &[1.0]);
    }

    #[test]
    fn test_initial_thread_count_is_overridden() {
        let result = parse(
            "Quantidade maxima de threads inicial: 16\n\
             Quantidade maxima de threads alterada para 4\n",
        );
        assert_eq!(result.threads, 4);

        let result = parse("Quantidade maxima de threads inicial: 16\n");
        assert_eq!(result.threads, 16);
    }

    #[test]
    fn test_crlf_and_whitespace_blank_lines() {
        let result = parse("Measuring idle (1s)\r\nPackage 0: PKG=1J\r\n  \r\n");
        assert_eq!(result.measures.len(), 1);
        assert_eq!(result.measures[0].packages[0].pkg, 1.0);
    }

    #[test]
    fn test_latin1_decoding() {
        let text = decode_latin1(&[b'S', 0xE1, b'i', b'd', b'a']);
        assert_eq!(text, "S\u{e1}ida");
    }
}
