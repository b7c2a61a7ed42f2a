//! CLI command handlers
//!
//! Argument parsing structures, logging setup and the handlers behind each
//! subcommand.

pub mod args;
pub mod help;
pub mod router;

pub use args::{Cli, Commands};
pub use help::{get_log_level, init_logging};
pub use router::{execute_command, run_interactive};
