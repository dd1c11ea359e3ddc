//! gencat CLI entry point
//!
//! Parses arguments, runs the selected command and renders configuration
//! errors with details and suggestions. Exits with status 1 on any error.

use clap::Parser;
use gencat::cli;
use gencat::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        user_friendly_error(e).display();
        std::process::exit(1);
    }
}
