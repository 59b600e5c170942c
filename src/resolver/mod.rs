//! Install plan resolution.
//!
//! Given one validated [`ProjectRecord`], compute the concrete plan an
//! external installer would execute. Resolution is a pure in-memory
//! transformation: no network, no filesystem, no retries. The actual
//! fetching and extraction belong to the consuming panel.
//!
//! # Priority order (first match wins)
//!
//! 1. Not GitHub-hosted → [`InstallPlan::GenericLink`]. The record is a
//!    generic URI reference; branch/subdir semantics do not apply. This is
//!    a degraded plan, not an error.
//! 2. GitHub-hosted and directly installable → [`InstallPlan::DirectFetch`]
//!    with the pinned branch (or the `"default"` sentinel) and optional
//!    subdirectory.
//! 3. GitHub-hosted but not direct → [`InstallPlan::ManualFetch`]; the
//!    caller surfaces the repository link for manual handling.

use crate::constants::DEFAULT_BRANCH;
use crate::core::WorkshopError;
use crate::index::ProjectRecord;
use crate::utils::paths::{validate_dir_segment, validate_no_traversal};
use serde::Serialize;
use std::fmt;

/// The resolved, mode-tagged description of how to fetch one record.
///
/// Serializes with a `mode` tag and camelCase fields to match the index
/// document's own conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all_fields = "camelCase")]
pub enum InstallPlan {
    /// Non-GitHub source: hand the URL to the user, nothing is fetched
    /// automatically.
    GenericLink {
        /// The record's `link`, verbatim.
        source_url: String,
        /// Directory the package should occupy once installed.
        target_dir: String,
    },
    /// GitHub source the installer may fetch and extract unattended.
    DirectFetch {
        /// The GitHub repository URL.
        source_url: String,
        /// Branch to fetch, or the `"default"` sentinel.
        branch: String,
        /// Path inside the fetched tree holding the installable unit;
        /// `None` means the repository root.
        #[serde(skip_serializing_if = "Option::is_none")]
        subdir: Option<String>,
        /// Directory the package should occupy once installed.
        target_dir: String,
    },
    /// GitHub source that needs manual download (e.g. release assets).
    ManualFetch {
        /// The GitHub repository URL.
        source_url: String,
        /// Directory the package should occupy once installed.
        target_dir: String,
    },
}

impl InstallPlan {
    /// The plan's mode tag, as it appears in serialized output.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::GenericLink { .. } => "GenericLink",
            Self::DirectFetch { .. } => "DirectFetch",
            Self::ManualFetch { .. } => "ManualFetch",
        }
    }

    /// The source URL the plan points at.
    #[must_use]
    pub fn source_url(&self) -> &str {
        match self {
            Self::GenericLink { source_url, .. }
            | Self::DirectFetch { source_url, .. }
            | Self::ManualFetch { source_url, .. } => source_url,
        }
    }

    /// The target directory name.
    #[must_use]
    pub fn target_dir(&self) -> &str {
        match self {
            Self::GenericLink { target_dir, .. }
            | Self::DirectFetch { target_dir, .. }
            | Self::ManualFetch { target_dir, .. } => target_dir,
        }
    }
}

impl fmt::Display for InstallPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mode:       {}", self.mode())?;
        writeln!(f, "source:     {}", self.source_url())?;
        if let Self::DirectFetch { branch, subdir, .. } = self {
            writeln!(f, "branch:     {branch}")?;
            writeln!(f, "subdir:     {}", subdir.as_deref().unwrap_or("(repository root)"))?;
        }
        write!(f, "target dir: {}", self.target_dir())
    }
}

/// Resolve one validated record to its installation plan.
///
/// # Errors
///
/// [`WorkshopError::UnsafePath`] when `dir` is not a single safe path
/// segment, or when a GitHub record's `subdir` contains traversal segments.
/// A rejected path is never normalized into a plan.
pub fn resolve(record: &ProjectRecord) -> Result<InstallPlan, WorkshopError> {
    let target_dir = record.dir.trim();
    validate_dir_segment("dir", target_dir)?;
    let target_dir = target_dir.to_string();

    if !record.is_github {
        // Generic URI reference; direct/branch/subdir are ignored entirely.
        return Ok(InstallPlan::GenericLink {
            source_url: record.link.clone(),
            target_dir,
        });
    }

    // Empty-after-trim subdir means "repository root". Present values are
    // concatenated onto the fetched tree by the installer, so traversal is
    // rejected here rather than cleaned up.
    let subdir = match record.subdir.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => {
            validate_no_traversal("subdir", s)?;
            Some(s.to_string())
        }
        _ => None,
    };

    if record.direct {
        let branch = match record.branch.as_deref().map(str::trim) {
            Some(b) if !b.is_empty() => b.to_string(),
            _ => DEFAULT_BRANCH.to_string(),
        };
        return Ok(InstallPlan::DirectFetch {
            source_url: record.link.clone(),
            branch,
            subdir,
            target_dir,
        });
    }

    Ok(InstallPlan::ManualFetch {
        source_url: record.link.clone(),
        target_dir,
    })
}
