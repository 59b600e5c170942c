//! Resolve a record to its installation plan.
//!
//! Loads the index, looks up the record by id, and prints the mode-tagged
//! plan the external installer would execute. Unknown ids and unsafe paths
//! exit non-zero.
//!
//! ```bash
//! workshop resolve medialibrary-pro
//! workshop resolve bscore ./repo.json --format json
//! ```

use crate::cli::OutputFormat;
use crate::config::GlobalConfig;
use crate::{resolver, source};
use anyhow::Result;
use clap::Args;

/// Command to resolve one record's installation plan.
#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Id of the record to resolve.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Index location: a local path or an http(s) URL. Falls back to the
    /// configured index_url, then to the built-in default.
    #[arg(value_name = "INDEX")]
    pub index: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ResolveCommand {
    /// Run the resolution.
    ///
    /// # Errors
    ///
    /// Load errors, an unknown id, or a resolution error for the record.
    pub async fn execute(self, global: &GlobalConfig) -> Result<()> {
        let location = global.resolve_index(self.index.as_deref());
        let doc = source::load_index(location, global.duplicate_ids).await?;

        let record = doc.get(&self.id)?;
        let plan = resolver::resolve(record)?;

        match self.format {
            OutputFormat::Text => println!("{plan}"),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        }
        Ok(())
    }
}
