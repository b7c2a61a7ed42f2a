//! Command routing and execution

use crate::aggregate::{aggregate, analyze_files, ResultAverage};
use crate::cli::args::Commands;
use crate::compare::{compare, ComparisonMetric};
use crate::config::AnalyzerConfig;
use crate::measure::BenchResult;
use crate::parser::LogParser;
use crate::report::{render_comparison, render_summary, ReportSettings};
use crate::shell::{DirCatalog, Session};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::error;

#[derive(Serialize)]
struct ShowOutput<'a> {
    result: &'a BenchResult,
    average: &'a ResultAverage<'a>,
}

/// Execute a CLI command, writing its report to `out`
pub fn execute_command(command: Commands, config: &AnalyzerConfig, out: &mut dyn Write) -> Result<()> {
    let parser = LogParser::new(config.parser.clone());
    match command {
        Commands::Show {
            file,
            json,
            confidence,
        } => {
            let settings = ReportSettings {
                show_confidence: confidence || config.report.show_confidence,
            };
            run_show(&parser, &file, json, &settings, out)
        }
        Commands::Compare {
            files,
            metric,
            json,
        } => run_compare(&parser, &files, metric, json, out),
        Commands::Points { file } => run_points(&parser, &file, out),
        Commands::Interactive { root } => {
            let root = root.unwrap_or_else(|| config.results_dir.clone());
            let session = Session::new(DirCatalog::new(root), parser, config.report.clone());
            let stdin = std::io::stdin();
            run_interactive(session, &mut stdin.lock(), out)
        }
    }
}

fn parse_with_context(parser: &LogParser, file: &Path) -> Result<BenchResult> {
    parser
        .parse_file(file)
        .with_context(|| format!("Failed to analyze {}", file.display()))
}

fn run_show(
    parser: &LogParser,
    file: &Path,
    json: bool,
    settings: &ReportSettings,
    out: &mut dyn Write,
) -> Result<()> {
    let result = parse_with_context(parser, file)?;
    let average = aggregate(&result);

    if json {
        let output = ShowOutput {
            result: &result,
            average: &average,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write!(out, "{}", render_summary(&average, settings)?)?;
    }
    Ok(())
}

fn run_compare(
    parser: &LogParser,
    files: &[PathBuf],
    metric: ComparisonMetric,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut results = Vec::with_capacity(files.len());
    for (path, outcome) in files.iter().zip(analyze_files(parser, files)) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => error!("Skipping {}: {}", path.display(), e),
        }
    }
    if results.is_empty() {
        bail!("No log could be analyzed");
    }

    let averages: Vec<ResultAverage<'_>> = results.iter().map(aggregate).collect();
    let comparison = compare(&averages, metric)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&comparison)?)?;
    } else {
        write!(out, "{}", render_comparison(&comparison))?;
    }
    Ok(())
}

fn run_points(parser: &LogParser, file: &Path, out: &mut dyn Write) -> Result<()> {
    let result = parse_with_context(parser, file)?;
    let average = aggregate(&result);

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["time_s", "energy_j"])?;
    for (time, energy) in average.energy_time_points() {
        writer.serialize((time, energy))?;
    }
    writer.flush()?;
    Ok(())
}

/// Drive a shell session until it closes or input ends
pub fn run_interactive(mut session: Session, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
    let mut line = String::new();
    while !session.is_closed() {
        write!(out, "{}", session.prompt()?)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match session.handle(&line) {
            Ok(text) => write!(out, "{text}")?,
            Err(e) => writeln!(out, "{e}")?,
        }
    }
    Ok(())
}
