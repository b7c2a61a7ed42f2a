//! Interactive result browser
//!
//! Navigation is an explicit state machine. [`apply`] is pure: it takes the
//! current state and a command and returns the next state, consulting a
//! [`Catalog`] only to validate names. [`Session`] wraps it with the I/O of
//! parsing, aggregating and rendering.
//!
//! ```text
//! ┌─────────────────┐  folder   ┌───────────────┐  file(s)  ┌───────────────┐
//! │ SelectingFolder │ ────────▶ │ SelectingFile │ ────────▶ │ ShowingResult │
//! └─────────────────┘ ◀──────── └───────────────┘ ◀──────── └───────────────┘
//!                       back                        back
//!
//! close/exit from any state ──▶ Closed
//! ```

use crate::aggregate::{aggregate, ResultAverage};
use crate::compare::{compare, ComparisonMetric};
use crate::error::{AnalyzerError, Result};
use crate::measure::BenchResult;
use crate::parser::LogParser;
use crate::report::{render_comparison, render_summary, ReportSettings};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Chart name for the per-run energy/time pairs of a single result
pub const POINTS_VIEW: &str = "jxs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    SelectingFolder,
    SelectingFile { folder: String },
    ShowingResult { folder: String, files: Vec<String> },
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Close,
    Back,
    Input(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "close" | "exit" => Self::Close,
            "return" | "r" | "back" | "b" => Self::Back,
            other => Self::Input(other.to_string()),
        }
    }
}

/// Source of selectable folders and files
pub trait Catalog {
    fn folders(&self) -> Result<Vec<String>>;
    fn files(&self, folder: &str) -> Result<Vec<String>>;
}

/// Catalog backed by a results directory on disk
#[derive(Debug, Clone)]
pub struct DirCatalog {
    root: PathBuf,
}

impl DirCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, folder: &str, file: &str) -> PathBuf {
        self.root.join(folder).join(file)
    }

    fn entries(&self, dir: &Path, want_dirs: bool) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| AnalyzerError::io(dir, e))? {
            let entry = entry.map_err(|e| AnalyzerError::io(dir, e))?;
            if entry.path().is_dir() == want_dirs {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl Catalog for DirCatalog {
    /// Sub-folders of the root, hiding `__`-prefixed ones such as caches
    fn folders(&self) -> Result<Vec<String>> {
        let mut folders = self.entries(&self.root, true)?;
        folders.retain(|name| !name.starts_with("__"));
        Ok(folders)
    }

    fn files(&self, folder: &str) -> Result<Vec<String>> {
        self.entries(&self.root.join(folder), false)
    }
}

fn rejected(message: impl Into<String>) -> AnalyzerError {
    AnalyzerError::Shell(message.into())
}

/// Whether `input` names a view available in `ShowingResult`
fn is_view(input: &str, file_count: usize) -> bool {
    if file_count == 1 && input.eq_ignore_ascii_case(POINTS_VIEW) {
        return true;
    }
    input.parse::<ComparisonMetric>().is_ok()
}

/// Compute the next state
///
/// Invalid names or moves are rejected and leave the caller's state as is.
pub fn apply(state: &ShellState, command: &ShellCommand, catalog: &dyn Catalog) -> Result<ShellState> {
    match (state, command) {
        (ShellState::Closed, _) => Err(rejected("Shell is closed")),
        (_, ShellCommand::Close) => Ok(ShellState::Closed),

        (ShellState::SelectingFolder, ShellCommand::Back) => {
            Err(rejected("Can't return, already at start point"))
        }
        (ShellState::SelectingFile { .. }, ShellCommand::Back) => Ok(ShellState::SelectingFolder),
        (ShellState::ShowingResult { folder, .. }, ShellCommand::Back) => {
            Ok(ShellState::SelectingFile {
                folder: folder.clone(),
            })
        }

        (ShellState::SelectingFolder, ShellCommand::Input(name)) => {
            if catalog.folders()?.contains(name) {
                Ok(ShellState::SelectingFile {
                    folder: name.clone(),
                })
            } else {
                Err(rejected("Unknown folder"))
            }
        }
        (ShellState::SelectingFile { folder }, ShellCommand::Input(input)) => {
            let available = catalog.files(folder)?;
            let files: Vec<String> = input.split_whitespace().map(str::to_string).collect();
            if files.is_empty() || files.iter().any(|f| !available.contains(f)) {
                return Err(rejected("Unknown file"));
            }
            Ok(ShellState::ShowingResult {
                folder: folder.clone(),
                files,
            })
        }
        (ShellState::ShowingResult { files, .. }, ShellCommand::Input(input)) => {
            if is_view(input, files.len()) {
                Ok(state.clone())
            } else {
                Err(rejected("Unknown graph"))
            }
        }
    }
}

/// Interactive session over a directory of results
pub struct Session {
    state: ShellState,
    catalog: DirCatalog,
    parser: LogParser,
    settings: ReportSettings,
    results: Vec<BenchResult>,
}

impl Session {
    pub fn new(catalog: DirCatalog, parser: LogParser, settings: ReportSettings) -> Self {
        Self {
            state: ShellState::SelectingFolder,
            catalog,
            parser,
            settings,
            results: Vec::new(),
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ShellState::Closed
    }

    /// Text shown before reading the next command
    pub fn prompt(&self) -> Result<String> {
        let text = match &self.state {
            ShellState::SelectingFolder => {
                format!("Folders: {}\nFolder name: ", self.catalog.folders()?.join(" "))
            }
            ShellState::SelectingFile { folder } => {
                format!("Files: {}\nFile to analyze: ", self.catalog.files(folder)?.join(" "))
            }
            ShellState::ShowingResult { .. } => {
                "Graphs: energy, time, j/s, mflops/w\nPick a graph: ".to_string()
            }
            ShellState::Closed => String::new(),
        };
        Ok(text)
    }

    /// Handle one input line and return the text to display
    ///
    /// A rejected command is reported as an error and the state is kept.
    pub fn handle(&mut self, line: &str) -> Result<String> {
        let command = ShellCommand::parse(line);
        let next = apply(&self.state, &command, &self.catalog)?;
        debug!(from = ?self.state, to = ?next, "Shell transition");

        let was_showing = matches!(self.state, ShellState::ShowingResult { .. });
        let output = match (&next, &command) {
            (ShellState::ShowingResult { folder, files }, _) if !was_showing => {
                self.load(folder, files)?
            }
            (ShellState::ShowingResult { .. }, ShellCommand::Input(view)) => self.view(view)?,
            _ => String::new(),
        };
        if !matches!(next, ShellState::ShowingResult { .. }) {
            self.results.clear();
        }
        self.state = next;
        Ok(output)
    }

    fn load(&mut self, folder: &str, files: &[String]) -> Result<String> {
        let results = files
            .iter()
            .map(|file| self.parser.parse_file(&self.catalog.path(folder, file)))
            .collect::<Result<Vec<_>>>()?;

        let output = match results.as_slice() {
            [single] => render_summary(&aggregate(single), &self.settings)?,
            _ => String::new(),
        };
        self.results = results;
        Ok(output)
    }

    fn view(&self, view: &str) -> Result<String> {
        let averages: Vec<ResultAverage<'_>> = self.results.iter().map(aggregate).collect();
        if view.eq_ignore_ascii_case(POINTS_VIEW) {
            let mut out = String::from("Time (s)  Energy (J)\n");
            for average in &averages {
                for (time, energy) in average.energy_time_points() {
                    let _ = writeln!(out, "{time:<8}  {energy}");
                }
            }
            return Ok(out);
        }

        let metric: ComparisonMetric = view.parse().map_err(AnalyzerError::Shell)?;
        Ok(render_comparison(&compare(&averages, metric)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FixedCatalog;

    impl Catalog for FixedCatalog {
        fn folders(&self) -> Result<Vec<String>> {
            Ok(vec!["run1".to_string()])
        }

        fn files(&self, _folder: &str) -> Result<Vec<String>> {
            Ok(vec!["O2-map-4t.log".to_string(), "O3-map-4t.log".to_string()])
        }
    }

    fn input(text: &str) -> ShellCommand {
        ShellCommand::parse(text)
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(input("exit"), ShellCommand::Close);
        assert_eq!(input(" b "), ShellCommand::Back);
        assert_eq!(input("run1"), ShellCommand::Input("run1".to_string()));
    }

    #[test]
    fn test_forward_transitions() {
        let state = apply(&ShellState::SelectingFolder, &input("run1"), &FixedCatalog).unwrap();
        assert_eq!(
            state,
            ShellState::SelectingFile {
                folder: "run1".to_string()
            }
        );

        let state = apply(&state, &input("O2-map-4t.log O3-map-4t.log"), &FixedCatalog).unwrap();
        assert_eq!(
            state,
            ShellState::ShowingResult {
                folder: "run1".to_string(),
                files: vec!["O2-map-4t.log".to_string(), "O3-map-4t.log".to_string()],
            }
        );

        let same = apply(&state, &input("mflops/w"), &FixedCatalog).unwrap();
        assert_eq!(same, state);
    }

    #[test]
    fn test_back_transitions() {
        let showing = ShellState::ShowingResult {
            folder: "run1".to_string(),
            files: vec!["O2-map-4t.log".to_string()],
        };
        let state = apply(&showing, &input("back"), &FixedCatalog).unwrap();
        let state = apply(&state, &input("r"), &FixedCatalog).unwrap();
        assert_eq!(state, ShellState::SelectingFolder);
        assert!(apply(&state, &input("b"), &FixedCatalog).is_err());
    }

    #[test]
    fn test_rejected_inputs() {
        let selecting = ShellState::SelectingFile {
            folder: "run1".to_string(),
        };
        assert!(apply(&ShellState::SelectingFolder, &input("nope"), &FixedCatalog).is_err());
        assert!(apply(&selecting, &input("O2-map-4t.log missing.log"), &FixedCatalog).is_err());

        let two_files = ShellState::ShowingResult {
            folder: "run1".to_string(),
            files: vec!["a".to_string(), "b".to_string()],
        };
        assert!(apply(&two_files, &input("jxs"), &FixedCatalog).is_err());
        assert!(apply(&two_files, &input("pie"), &FixedCatalog).is_err());
    }

    #[test]
    fn test_close_from_any_state() {
        for state in [
            ShellState::SelectingFolder,
            ShellState::SelectingFile {
                folder: "run1".to_string(),
            },
        ] {
            assert_eq!(
                apply(&state, &input("close"), &FixedCatalog).unwrap(),
                ShellState::Closed
            );
        }
        assert!(apply(&ShellState::Closed, &input("run1"), &FixedCatalog).is_err());
    }

    #[test]
    fn test_dir_catalog_hides_private_folders() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("run1")).unwrap();
        fs::create_dir(temp_dir.path().join("__pycache__")).unwrap();
        fs::write(temp_dir.path().join("run1").join("O2-map-4t.log"), "").unwrap();
        fs::create_dir(temp_dir.path().join("run1").join("nested")).unwrap();

        let catalog = DirCatalog::new(temp_dir.path());
        assert_eq!(catalog.folders().unwrap(), vec!["run1"]);
        assert_eq!(catalog.files("run1").unwrap(), vec!["O2-map-4t.log"]);
    }

    #[test]
    fn test_session_shows_summary_for_single_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("run1")).unwrap();
        fs::write(
            temp_dir.path().join("run1").join("O2-map-4t.log"),
            "Quantidade maxima de threads alterada para 4\n\n\
             Initialize Map (8x8 array)\nExecution time: 0.5s\nPackage 0: PKG=3J\n\n",
        )
        .unwrap();

        let mut session = Session::new(
            DirCatalog::new(temp_dir.path()),
            LogParser::default(),
            ReportSettings::default(),
        );
        assert!(session.prompt().unwrap().contains("run1"));
        session.handle("run1").unwrap();
        let summary = session.handle("O2-map-4t.log").unwrap();
        assert!(summary.starts_with("Algorithm: Map\nThreads: 4"));

        let points = session.handle("jxs").unwrap();
        assert!(points.contains("0.5"));
        assert!(session.handle("pie").is_err());
        assert!(matches!(session.state(), ShellState::ShowingResult { .. }));

        session.handle("exit").unwrap();
        assert!(session.is_closed());
    }

    #[test]
    fn test_failed_summary_keeps_file_selection() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("run1")).unwrap();
        fs::write(
            temp_dir.path().join("run1").join("O0-idle.log"),
            "Measuring idle (1s)\nPackage 0: PKG=5J\n\n",
        )
        .unwrap();

        let mut session = Session::new(
            DirCatalog::new(temp_dir.path()),
            LogParser::default(),
            ReportSettings::default(),
        );
        session.handle("run1").unwrap();
        let err = session.handle("O0-idle.log").unwrap_err();
        assert!(matches!(err, AnalyzerError::NoWorkload { .. }));
        assert_eq!(
            session.state(),
            &ShellState::SelectingFile {
                folder: "run1".to_string()
            }
        );
        assert!(session.results.is_empty());
    }
}
