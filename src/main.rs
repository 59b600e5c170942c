//! Workshop CLI entry point.
//!
//! Parses the command line, executes the selected command, and renders
//! failures as user-friendly errors with suggestions:
//! - `validate` - check an index document
//! - `resolve` - print a record's installation plan
//! - `list` - show index records
//! - `crawl` - discover new plugins/themes on GitHub

use anyhow::Result;
use clap::Parser;
use workshop_cli::cli;
use workshop_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
