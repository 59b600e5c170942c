//! Progress reporting for long-running crawls.
//!
//! Thin wrapper around `indicatif` so callers deal in crawl terms rather
//! than template strings. The bar is hidden (not just unstyled) when the
//! user passed `--no-progress` or output is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Progress bar shown while the crawler walks search results.
pub struct CrawlProgress {
    bar: ProgressBar,
}

impl CrawlProgress {
    /// Create a bar over `len` repositories. When `enabled` is false the bar
    /// is a hidden no-op, which keeps call sites free of conditionals.
    #[must_use]
    pub fn new(len: u64, enabled: bool) -> Self {
        let bar = if enabled && std::io::stderr().is_terminal() {
            let bar = ProgressBar::new(len);
            let style = ProgressStyle::with_template(
                "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style.progress_chars("=> "));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }

    /// Show which repository is currently being inspected.
    pub fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    /// Advance by one repository.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Remove the bar from the terminal.
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
