//! List the records of an index.
//!
//! The read-only query surface the administration panel consumes: records
//! in document order, optionally filtered by type.
//!
//! ```bash
//! workshop list
//! workshop list --type theme
//! workshop list ./repo.json --format json
//! ```

use crate::cli::OutputFormat;
use crate::config::GlobalConfig;
use crate::index::ProjectType;
use crate::source;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to list index records.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Index location: a local path or an http(s) URL. Falls back to the
    /// configured index_url, then to the built-in default.
    #[arg(value_name = "INDEX")]
    pub index: Option<String>,

    /// Only show records of this type.
    #[arg(long = "type", value_enum, value_name = "TYPE")]
    pub kind: Option<ProjectType>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Run the listing.
    ///
    /// # Errors
    ///
    /// Fetch and format errors from loading the index.
    pub async fn execute(self, global: &GlobalConfig) -> Result<()> {
        let location = global.resolve_index(self.index.as_deref());
        let doc = source::load_index(location, global.duplicate_ids).await?;

        let records: Vec<_> = doc
            .projects
            .iter()
            .filter(|p| self.kind.is_none_or(|kind| p.kind == kind))
            .collect();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            OutputFormat::Text => {
                println!(
                    "{} (updated {}, {} record(s))",
                    "Workshop index".bold(),
                    doc.updated_at,
                    records.len()
                );
                for record in records {
                    let version =
                        if record.version.is_empty() { "-" } else { record.version.as_str() };
                    println!(
                        "  {:<28} {:<8} {:<10} {}",
                        record.id.cyan(),
                        record.kind.as_str(),
                        version,
                        record.name
                    );
                }
            }
        }
        Ok(())
    }
}
