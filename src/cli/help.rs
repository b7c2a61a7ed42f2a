//! Logging setup for the binary

use tracing::{debug, trace};

/// Filter for a `-v` count
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Pick the filter: any `-v` wins over the configured level
pub fn resolve_log_level(verbose: u8, configured: Option<&str>) -> String {
    match (verbose, configured) {
        (0, Some(level)) => level.to_lowercase(),
        _ => get_log_level(verbose).to_string(),
    }
}

/// Install the global subscriber, writing to stderr so reports stay on stdout
pub fn init_logging(verbose: u8, configured: Option<&str>) {
    let log_level = resolve_log_level(verbose, configured);

    tracing_subscriber::fmt()
        .with_env_filter(log_level.as_str())
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(verbose >= 3)
        .with_line_number(verbose >= 3)
        .init();

    debug!("rapl-report started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}
