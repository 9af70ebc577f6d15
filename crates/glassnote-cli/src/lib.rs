pub mod cli;
pub mod commands;
pub mod logging;
pub mod utils;

use clap::Parser;
use cli::Glassnote;
use commands::handle_command;
use logging::{init_logging, LogTarget};
use std::process;

/// Run the glassnote CLI application
pub fn run_main() {
    let args = Glassnote::parse();

    // The notepad owns the terminal, so its logs go to a file
    let target = if args.commands.is_none() {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    init_logging(target);

    if let Err(e) = handle_command(args.commands) {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
