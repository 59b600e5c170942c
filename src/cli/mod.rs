//! Command-line interface for the Workshop toolkit.
//!
//! Each command lives in its own module with its own argument struct and
//! execution logic:
//!
//! - `validate` - check an index document, exit non-zero on format errors
//! - `resolve` - print the installation plan for one record
//! - `list` - show the records of an index in document order
//! - `crawl` - discover new plugins/themes on GitHub and merge them in
//!
//! # Global Options
//!
//! All commands accept:
//! - `--verbose` / `--quiet` - log verbosity (mutually exclusive)
//! - `--config` - path to an alternative config file
//! - `--no-progress` - disable progress bars for automation
//!
//! The index location argument accepted by every command may be a local
//! path or an `http(s)` URL; when omitted it falls back to `index_url`
//! from the config file and then to the built-in default.

mod crawl;
mod list;
mod resolve;
pub mod validate;

use crate::config::GlobalConfig;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Output format shared by the read-only commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors.
    Text,
    /// Structured JSON suitable for automation.
    Json,
}

/// Top-level CLI for the Workshop toolkit.
#[derive(Parser)]
#[command(
    name = "workshop",
    about = "Typecho Workshop index toolkit",
    version,
    long_about = "Validate the Workshop plugin/theme index, resolve installation plans, \
                  and keep the index fresh by crawling GitHub."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternative config file (default ~/.workshop/config.toml,
    /// or $WORKSHOP_CONFIG).
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Disable progress bars and spinners.
    #[arg(long, global = true)]
    no_progress: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate an index document.
    ///
    /// Exits 0 when the document conforms to the schema; prints a
    /// diagnostic naming the record and field otherwise.
    Validate(validate::ValidateCommand),

    /// Resolve a record to its installation plan.
    Resolve(resolve::ResolveCommand),

    /// List the records of an index in document order.
    List(list::ListCommand),

    /// Crawl GitHub for Typecho plugins/themes and merge them into a
    /// local index file.
    Crawl(crawl::CrawlCommand),
}

impl Cli {
    /// Execute the parsed command line.
    ///
    /// Initializes logging from the verbosity flags, loads the global
    /// config, and dispatches to the subcommand.
    ///
    /// # Errors
    ///
    /// Any command failure; the binary boundary turns it into a
    /// user-friendly message and a non-zero exit.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let global = GlobalConfig::load_or_default(self.config.as_deref())?;

        match self.command {
            Commands::Validate(cmd) => cmd.execute(&global).await,
            Commands::Resolve(cmd) => cmd.execute(&global).await,
            Commands::List(cmd) => cmd.execute(&global).await,
            Commands::Crawl(cmd) => cmd.execute(&global, self.no_progress).await,
        }
    }

    fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };

        // try_init: tests may execute multiple commands in one process.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_validate() {
        let cli = Cli::try_parse_from(["workshop", "validate", "repo.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["workshop", "--verbose", "--quiet", "list"]).is_err());
    }

    #[test]
    fn test_resolve_requires_id() {
        assert!(Cli::try_parse_from(["workshop", "resolve"]).is_err());
        assert!(Cli::try_parse_from(["workshop", "resolve", "plugin-foo"]).is_ok());
    }
}
