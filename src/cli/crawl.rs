//! Crawl GitHub and merge discoveries into a local index file.
//!
//! The index is static data; this command is the maintenance tool that
//! keeps it fresh. It only writes local files: crawling against the
//! published URL would have nowhere to put the result.
//!
//! ```bash
//! workshop crawl ./repo.json
//! workshop crawl ./repo.json --plugins 40 --themes 10
//! workshop crawl ./repo.json --dry-run
//! GITHUB_TOKEN=... workshop crawl ./repo.json --pages 3
//! ```

use crate::config::GlobalConfig;
use crate::core::WorkshopError;
use crate::crawler::{self, CrawlOptions};
use crate::index::IndexDocument;
use crate::source;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

/// Command to crawl GitHub for new plugins and themes.
#[derive(Debug, Args)]
pub struct CrawlCommand {
    /// Local index file to update. Falls back to the configured index_url
    /// when that names a local path.
    #[arg(value_name = "INDEX")]
    pub index: Option<String>,

    /// Maximum plugin records to add or update.
    #[arg(long, default_value_t = 25)]
    pub plugins: usize,

    /// Maximum theme records to add or update.
    #[arg(long, default_value_t = 25)]
    pub themes: usize,

    /// Search results per page (1-100).
    #[arg(long, default_value_t = 50)]
    pub per_page: u32,

    /// Search pages to walk per query.
    #[arg(long, default_value_t = 2)]
    pub pages: u32,

    /// Crawl and report, but do not write the index.
    #[arg(long)]
    pub dry_run: bool,
}

impl CrawlCommand {
    /// Run the crawl.
    ///
    /// # Errors
    ///
    /// A remote index location, load errors, GitHub API failures, or a
    /// failed write of the updated document.
    pub async fn execute(self, global: &GlobalConfig, no_progress: bool) -> Result<()> {
        let location = global.resolve_index(self.index.as_deref()).to_string();
        if source::is_remote(&location) {
            return Err(WorkshopError::ConfigError {
                message: format!(
                    "crawl updates a local index file, but '{location}' is a URL; \
                     pass a local path"
                ),
            }
            .into());
        }

        let path = Path::new(&location);
        let mut doc = if path.exists() {
            IndexDocument::load_with_policy(path, global.duplicate_ids)?
        } else {
            tracing::info!(path = %location, "index file absent, starting empty");
            IndexDocument { updated_at: String::new(), projects: Vec::new() }
        };

        let options = CrawlOptions {
            plugins: self.plugins,
            themes: self.themes,
            per_page: self.per_page,
            pages: self.pages,
            progress: !no_progress,
        };

        let report = crawler::crawl(&mut doc, &options).await?;

        if self.dry_run {
            println!(
                "{} discovered {} record(s): {} new, {} updated (dry run, nothing written)",
                "✓".green().bold(),
                report.discovered,
                report.added,
                report.updated
            );
            return Ok(());
        }

        std::fs::write(path, doc.to_json_string()?)?;
        println!(
            "{} {} updated: {} new, {} updated, {} total record(s)",
            "✓".green().bold(),
            location,
            report.added,
            report.updated,
            doc.projects.len()
        );
        Ok(())
    }
}
