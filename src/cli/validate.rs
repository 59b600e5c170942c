//! Validate an index document.
//!
//! Performs the full fail-fast load: top-level structure, per-record field
//! presence and types, the `type` enum, URL syntax, and the duplicate-id
//! policy. The exit code is the contract: 0 for a valid document, non-zero
//! with a diagnostic naming the record index and field otherwise.
//!
//! ```bash
//! workshop validate                     # default index from config
//! workshop validate ./repo.json         # local file
//! workshop validate --strict            # duplicate ids become errors
//! workshop validate --format json       # machine-readable result
//! ```

use crate::cli::OutputFormat;
use crate::config::GlobalConfig;
use crate::index::DuplicateIdPolicy;
use crate::source;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to validate an index document.
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Index location: a local path or an http(s) URL. Falls back to the
    /// configured index_url, then to the built-in default.
    #[arg(value_name = "INDEX")]
    pub index: Option<String>,

    /// Treat duplicate-id warnings as errors.
    #[arg(long)]
    pub strict: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ValidateCommand {
    /// Run the validation.
    ///
    /// # Errors
    ///
    /// The underlying format or fetch error after the diagnostic has been
    /// printed, so the process exits non-zero.
    pub async fn execute(self, global: &GlobalConfig) -> Result<()> {
        let location = global.resolve_index(self.index.as_deref()).to_string();
        let policy = if self.strict { DuplicateIdPolicy::Deny } else { global.duplicate_ids };

        match source::load_index(&location, policy).await {
            Ok(doc) => {
                match self.format {
                    OutputFormat::Text => {
                        println!("{} {}", "✓".green().bold(), "Valid index document".bold());
                        println!(
                            "  {} project(s), updated {}",
                            doc.projects.len(),
                            doc.updated_at
                        );
                    }
                    OutputFormat::Json => {
                        let result = serde_json::json!({
                            "valid": true,
                            "location": location,
                            "updatedAt": doc.updated_at,
                            "projects": doc.projects.len(),
                        });
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    }
                }
                Ok(())
            }
            Err(error) => {
                match self.format {
                    OutputFormat::Text => {
                        println!("{} {}", "✗".red().bold(), "Invalid index document".bold());
                        println!("  {error}");
                    }
                    OutputFormat::Json => {
                        let result = serde_json::json!({
                            "valid": false,
                            "location": location,
                            "error": error.to_string(),
                        });
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    }
                }
                Err(error.into())
            }
        }
    }
}
