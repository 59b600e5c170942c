//! GitHub crawler for index maintenance.
//!
//! Discovers Typecho plugin and theme repositories through the GitHub
//! search API, reads their metadata out of `Plugin.php` / `index.php`, and
//! merges the results into an existing index document. This is how the
//! published `repo.json` grows without hand-editing every record.
//!
//! The crawl is deliberately sequential: a few dozen raw-file fetches per
//! run, bounded by `--plugins`/`--themes`, with the API quota as the real
//! limit. Repositories whose metadata cannot produce a valid install
//! directory are skipped, not guessed at.
//!
//! # Modules
//!
//! - [`docblock`] - PHP docblock metadata extraction
//! - [`merge`] - merging crawled records into an existing index

pub mod docblock;
pub mod merge;

use crate::constants::{GITHUB_API, GITHUB_RAW, GITHUB_TOKEN_VARS, HTTP_TIMEOUT, USER_AGENT};
use crate::core::WorkshopError;
use crate::index::{IndexDocument, ProjectRecord, ProjectType};
use crate::utils::paths::validate_url;
use crate::utils::progress::CrawlProgress;
use docblock::{clean_version, extract_class_prefix, first_docblock, parse_docblock, DocblockMeta};
use merge::{is_valid_dir, merge_projects, sanitize_dir, slugify, MergeStats};
use serde::Deserialize;

/// Limits and switches for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Maximum plugin records to discover.
    pub plugins: usize,
    /// Maximum theme records to discover.
    pub themes: usize,
    /// Search results per page (clamped to GitHub's 1..=100).
    pub per_page: u32,
    /// Search pages to walk per query.
    pub pages: u32,
    /// Whether to draw a progress bar.
    pub progress: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self { plugins: 25, themes: 25, per_page: 50, pages: 2, progress: true }
    }
}

/// Summary of one crawl run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlReport {
    /// Records discovered with usable metadata.
    pub discovered: usize,
    /// Records appended to the index.
    pub added: usize,
    /// Existing records that had blanks filled.
    pub updated: usize,
}

/// A repository as returned by the GitHub search API.
#[derive(Debug, Clone)]
pub struct DiscoveredRepo {
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Web URL of the repository.
    pub html_url: String,
    /// Repository description, possibly empty.
    pub description: String,
    /// Default branch name.
    pub default_branch: String,
    /// Homepage URL, possibly empty.
    pub homepage: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    name: Option<String>,
    html_url: Option<String>,
    description: Option<String>,
    default_branch: Option<String>,
    homepage: Option<String>,
    owner: Option<SearchOwner>,
}

#[derive(Deserialize)]
struct SearchOwner {
    login: Option<String>,
}

/// Minimal GitHub client: repository search plus raw-file reads.
pub struct GithubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GithubClient {
    /// Build a client, picking up a bearer token from the environment
    /// (`GITHUB_TOKEN`, then `GH_TOKEN`) when one is set.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::HttpError`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, WorkshopError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        let token = GITHUB_TOKEN_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(Self { client, token })
    }

    /// Search repositories, walking `pages` pages sorted by stars.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::RateLimited`] when the API quota is exhausted,
    /// [`WorkshopError::GithubApiError`] for other failures.
    pub async fn search_repos(
        &self,
        query: &str,
        per_page: u32,
        pages: u32,
    ) -> Result<Vec<DiscoveredRepo>, WorkshopError> {
        let per_page = per_page.clamp(1, 100);
        let mut repos = Vec::new();

        for page in 1..=pages.max(1) {
            tracing::debug!(query, page, "searching repositories");

            let per_page_param = per_page.to_string();
            let page_param = page.to_string();
            let mut request = self
                .client
                .get(format!("{GITHUB_API}/search/repositories"))
                .header("Accept", "application/vnd.github+json")
                .query(&[
                    ("q", query),
                    ("sort", "stars"),
                    ("order", "desc"),
                    ("per_page", per_page_param.as_str()),
                    ("page", page_param.as_str()),
                ]);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response =
                request.send().await.map_err(|e| WorkshopError::GithubApiError {
                    operation: "search repositories".to_string(),
                    reason: e.to_string(),
                })?;

            let status = response.status();
            if status == reqwest::StatusCode::FORBIDDEN {
                let body = response.text().await.unwrap_or_default();
                if body.to_lowercase().contains("rate limit") {
                    return Err(WorkshopError::RateLimited);
                }
                return Err(WorkshopError::GithubApiError {
                    operation: "search repositories".to_string(),
                    reason: format!("HTTP {status}"),
                });
            }
            if !status.is_success() {
                return Err(WorkshopError::GithubApiError {
                    operation: "search repositories".to_string(),
                    reason: format!("HTTP {status}"),
                });
            }

            let parsed: SearchResponse =
                response.json().await.map_err(|e| WorkshopError::GithubApiError {
                    operation: "search repositories".to_string(),
                    reason: format!("invalid response payload: {e}"),
                })?;

            for item in parsed.items {
                let owner = item
                    .owner
                    .and_then(|o| o.login)
                    .map(|l| l.trim().to_string())
                    .unwrap_or_default();
                let repo = item.name.map(|n| n.trim().to_string()).unwrap_or_default();
                if owner.is_empty() || repo.is_empty() {
                    continue;
                }
                let default_branch = item
                    .default_branch
                    .map(|b| b.trim().to_string())
                    .filter(|b| !b.is_empty())
                    .unwrap_or_else(|| "main".to_string());
                repos.push(DiscoveredRepo {
                    html_url: item
                        .html_url
                        .map(|u| u.trim().to_string())
                        .unwrap_or_default(),
                    description: item
                        .description
                        .map(|d| d.trim().to_string())
                        .unwrap_or_default(),
                    homepage: item.homepage.map(|h| h.trim().to_string()).unwrap_or_default(),
                    owner,
                    repo,
                    default_branch,
                });
            }
        }

        Ok(repos)
    }

    /// Fetch one file from the raw-content host. `None` means 404, which is
    /// how "this repository is not actually a plugin" shows up.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::GithubApiError`] for transport failures and non-404
    /// error statuses.
    pub async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>, WorkshopError> {
        let url = format!("{GITHUB_RAW}/{owner}/{repo}/{branch}/{}", path.trim_start_matches('/'));
        let response =
            self.client.get(&url).send().await.map_err(|e| WorkshopError::GithubApiError {
                operation: format!("fetch {path}"),
                reason: e.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(WorkshopError::GithubApiError {
                operation: format!("fetch {path}"),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let text = response.text().await.map_err(|e| WorkshopError::GithubApiError {
            operation: format!("fetch {path}"),
            reason: e.to_string(),
        })?;
        Ok(Some(text))
    }
}

/// Crawl GitHub and merge discoveries into `index`, stamping `updatedAt`.
///
/// # Errors
///
/// Search and fetch errors from [`GithubClient`]. A repository whose
/// metadata file is missing or unusable is skipped, not an error.
pub async fn crawl(
    index: &mut IndexDocument,
    options: &CrawlOptions,
) -> Result<CrawlReport, WorkshopError> {
    let client = GithubClient::from_env()?;

    let plugin_repos = client
        .search_repos("topic:typecho plugin fork:false archived:false", options.per_page, options.pages)
        .await?;
    let theme_repos = client
        .search_repos("topic:typecho theme fork:false archived:false", options.per_page, options.pages)
        .await?;

    let mut discovered = Vec::new();
    collect(&client, ProjectType::Plugin, &plugin_repos, options.plugins, options.progress, &mut discovered)
        .await?;
    collect(&client, ProjectType::Theme, &theme_repos, options.themes, options.progress, &mut discovered)
        .await?;

    let discovered_count = discovered.len();
    let MergeStats { added, updated } = merge_projects(&mut index.projects, discovered);
    index.updated_at = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    Ok(CrawlReport { discovered: discovered_count, added, updated })
}

async fn collect(
    client: &GithubClient,
    kind: ProjectType,
    repos: &[DiscoveredRepo],
    limit: usize,
    progress: bool,
    out: &mut Vec<ProjectRecord>,
) -> Result<(), WorkshopError> {
    let bar = CrawlProgress::new(repos.len().min(limit) as u64, progress);
    let metadata_file = match kind {
        ProjectType::Plugin => "Plugin.php",
        ProjectType::Theme => "index.php",
    };

    let mut added = 0;
    for repo in repos {
        if added >= limit {
            break;
        }
        bar.set_message(format!("{}/{}", repo.owner, repo.repo));

        let Some(text) =
            client.fetch_raw(&repo.owner, &repo.repo, &repo.default_branch, metadata_file).await?
        else {
            tracing::debug!(owner = %repo.owner, repo = %repo.repo, "no {metadata_file}, skipping");
            continue;
        };

        let Some(record) = build_record(kind, repo, &text) else {
            tracing::debug!(owner = %repo.owner, repo = %repo.repo, "no usable install dir, skipping");
            continue;
        };

        out.push(record);
        added += 1;
        bar.inc();
    }

    bar.finish_and_clear();
    Ok(())
}

/// Turn one repository plus its metadata file into a project record.
/// Returns `None` when no valid install directory can be derived.
fn build_record(kind: ProjectType, repo: &DiscoveredRepo, file_text: &str) -> Option<ProjectRecord> {
    let meta = first_docblock(file_text).map(parse_docblock).unwrap_or_else(DocblockMeta::default);
    let class_prefix = match kind {
        ProjectType::Plugin => extract_class_prefix(file_text),
        ProjectType::Theme => None,
    };

    let dir = build_dir(kind, &repo.repo, &meta, class_prefix.as_deref())?;

    let mut name = derive_display_name(&repo.repo, kind);
    if !meta.package.is_empty() && name.chars().count() > 40 {
        name = meta.package.clone();
    }

    let donate = derive_donate(&meta.link, &repo.homepage);

    let author = if meta.author.is_empty() { repo.owner.clone() } else { meta.author.clone() };
    let description =
        if repo.description.is_empty() { meta.description.clone() } else { repo.description.clone() };

    let slug = {
        let s = slugify(&dir);
        if s.is_empty() { slugify(&format!("{}-{}", repo.owner, repo.repo)) } else { s }
    };

    let link = if repo.html_url.is_empty() {
        format!("https://github.com/{}/{}", repo.owner, repo.repo)
    } else {
        repo.html_url.clone()
    };

    Some(ProjectRecord {
        id: format!("{kind}-{slug}"),
        name,
        kind,
        version: clean_version(&meta.version),
        author,
        typecho: String::new(),
        description,
        link,
        readme: None,
        is_github: true,
        direct: true,
        branch: None,
        subdir: None,
        donate,
        dir,
    })
}

/// Best install-directory candidate: `@package`, then the plugin class
/// prefix, then the cleaned-up repository name.
fn build_dir(
    kind: ProjectType,
    repo_name: &str,
    meta: &DocblockMeta,
    class_prefix: Option<&str>,
) -> Option<String> {
    if is_valid_dir(&meta.package) {
        return Some(meta.package.clone());
    }
    if let Some(prefix) = class_prefix
        && is_valid_dir(prefix)
    {
        return Some(prefix.to_string());
    }

    let derived = derive_display_name(repo_name, kind);
    if is_valid_dir(&derived) {
        return Some(derived);
    }
    let sanitized = sanitize_dir(&derived);
    if is_valid_dir(&sanitized) {
        return Some(sanitized);
    }
    let sanitized = sanitize_dir(repo_name);
    is_valid_dir(&sanitized).then_some(sanitized)
}

/// Strip the conventional `typecho-plugin-` / `typecho-theme-` repository
/// name prefixes to get a display name.
fn derive_display_name(repo_name: &str, kind: ProjectType) -> String {
    let trimmed = repo_name.trim();
    let lowered = trimmed.to_lowercase();
    let marker = match kind {
        ProjectType::Plugin => "plugin",
        ProjectType::Theme => "theme",
    };

    for sep1 in ['-', '_'] {
        for sep2 in ['-', '_'] {
            let prefix = format!("typecho{sep1}{marker}{sep2}");
            if lowered.starts_with(&prefix) {
                let rest = trimmed[prefix.len()..].trim_matches(['-', '_']).trim();
                if !rest.is_empty() {
                    return rest.to_string();
                }
            }
        }
        let prefix = format!("typecho{sep1}{marker}");
        if lowered == prefix {
            return trimmed.to_string();
        }
    }

    // "typechoplugin-foo" style, without a separator after "typecho".
    let compact = format!("typecho{marker}");
    if lowered.starts_with(&compact) {
        let rest = trimmed[compact.len()..].trim_matches(['-', '_']).trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }

    trimmed.to_string()
}

/// A donate link is the docblock `@link` when it points away from GitHub,
/// else the repository homepage. Only http(s) links are kept.
fn derive_donate(doc_link: &str, homepage: &str) -> Option<String> {
    let doc_link = doc_link.trim();
    if !doc_link.is_empty()
        && !doc_link.to_lowercase().starts_with("https://github.com/")
        && validate_url(doc_link).is_ok()
    {
        return Some(doc_link.to_string());
    }

    let homepage = homepage.trim();
    if !homepage.is_empty() && validate_url(homepage).is_ok() {
        return Some(homepage.to_string());
    }
    None
}
