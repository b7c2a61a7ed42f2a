//! Common test utilities and helpers
#![allow(dead_code)]

use std::fmt::Write;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds log text in the harness format
pub struct LogBuilder {
    text: String,
}

impl LogBuilder {
    /// Header lines for thread count, iterations and array size
    pub fn new(threads: u32, iterations: u64, array_size: u64) -> Self {
        let mut text = String::new();
        let _ = writeln!(text, "Quantidade maxima de threads alterada para {threads}");
        let _ = writeln!(text, "Quantidade de iteracoes alterado para {iterations}");
        let _ = writeln!(text, "Tamanho do array alterado para {array_size}x{array_size}");
        text.push('\n');
        Self { text }
    }

    /// Idle block with one `PKG` reading per package
    pub fn idle(mut self, packages: &[f64]) -> Self {
        self.text.push_str("Measuring idle (1s)\n");
        self.packages(packages);
        self.text.push('\n');
        self
    }

    /// Workload block followed by a blank line
    pub fn run(mut self, algorithm: &str, seconds: f64, packages: &[f64]) -> Self {
        self.block(algorithm, seconds, packages);
        self.text.push('\n');
        self
    }

    /// Workload block with no trailing blank line
    pub fn unterminated_run(mut self, algorithm: &str, seconds: f64, packages: &[f64]) -> Self {
        self.block(algorithm, seconds, packages);
        self
    }

    /// Raw line, for readings with extra domains
    pub fn line(mut self, line: &str) -> Self {
        self.text.push_str(line);
        self.text.push('\n');
        self
    }

    pub fn build(self) -> String {
        self.text
    }

    fn block(&mut self, algorithm: &str, seconds: f64, packages: &[f64]) {
        let _ = writeln!(self.text, "Initialize {algorithm} (8x8 array)");
        let _ = writeln!(self.text, "Execute {algorithm}");
        let _ = writeln!(self.text, "Execution time: {seconds}s");
        self.packages(packages);
        let _ = writeln!(self.text, "Clean {algorithm}");
    }

    fn packages(&mut self, packages: &[f64]) {
        for (n, pkg) in packages.iter().enumerate() {
            let _ = writeln!(self.text, "Package {n}: PKG={pkg}J");
        }
    }
}

/// Write `text` as `name` inside a temporary directory
pub fn write_log(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("Failed to write log fixture");
    path
}
