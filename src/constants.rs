//! Global constants used throughout the Workshop codebase.
//!
//! Defining these centrally keeps URLs and magic values discoverable and
//! consistent across the loader, the crawler and the CLI.

use std::time::Duration;

/// Default location of the published index document.
///
/// The index is plain static content served from a raw-file host; there is
/// no API in front of it. Commands fall back to this URL when neither the
/// command line nor the config file names an index.
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/typecho-workshop/workshop-index/master/repo.json";

/// Sentinel branch name meaning "whatever the repository's default branch is".
///
/// Install plans never carry an empty branch: a record without a pinned
/// branch resolves to this literal so the downstream installer has a single
/// code path.
pub const DEFAULT_BRANCH: &str = "default";

/// Base URL of the GitHub REST API, used by the crawler.
pub const GITHUB_API: &str = "https://api.github.com";

/// Base URL of the GitHub raw-content host, used by the crawler to fetch
/// `Plugin.php` / `index.php` without burning API quota.
pub const GITHUB_RAW: &str = "https://raw.githubusercontent.com";

/// User-Agent sent on every outgoing HTTP request. GitHub rejects requests
/// without one.
pub const USER_AGENT: &str = concat!("workshop-cli/", env!("CARGO_PKG_VERSION"));

/// Timeout applied to every HTTP request (index fetch and crawler calls).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(25);

/// Environment variables consulted for a GitHub bearer token, in order.
pub const GITHUB_TOKEN_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];
