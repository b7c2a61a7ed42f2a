use clap::Parser;
use rapl_report::cli::{execute_command, init_logging, Cli};
use rapl_report::config::AnalyzerConfig;
use tracing::error;

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AnalyzerConfig::load(cli.config.as_deref())?;
    init_logging(cli.verbose, config.log_level.as_deref());

    let stdout = std::io::stdout();
    execute_command(cli.command, &config, &mut stdout.lock())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
