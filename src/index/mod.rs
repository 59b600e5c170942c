//! Index document model and loader.
//!
//! The Workshop index is a single JSON document (`repo.json`) with a
//! top-level timestamp and an ordered list of project records describing
//! installable plugins and themes. This module owns the in-memory
//! representation and the loader that turns raw text into a validated
//! [`IndexDocument`].
//!
//! # Loading semantics
//!
//! Loading is **fail-fast, whole-document**: the first structural violation
//! (missing field, wrong type, unknown `type` value, malformed URL) rejects
//! the entire document with a record-level error naming the index and field.
//! A malformed index is an authoring error to be fixed at the source, not
//! skipped record-by-record.
//!
//! Optional fields stay absent (`None`) rather than being defaulted, so
//! downstream logic can distinguish "not specified" from "explicitly empty".
//!
//! Duplicate `id` values are permitted by the format; how they are treated
//! is governed by [`DuplicateIdPolicy`] (default: log a warning).
//!
//! # Example
//!
//! ```rust,no_run
//! use workshop_cli::index::IndexDocument;
//!
//! # fn example() -> anyhow::Result<()> {
//! let doc = IndexDocument::load(std::path::Path::new("repo.json"))?;
//! for project in &doc.projects {
//!     println!("{} {} ({})", project.id, project.version, project.kind);
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::WorkshopError;
use crate::utils::paths::validate_url;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The category of an installable package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// A Typecho plugin, installed under `usr/plugins/`.
    Plugin,
    /// A Typecho theme, installed under `usr/themes/`.
    Theme,
}

impl ProjectType {
    /// The lowercase wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plugin => "plugin",
            Self::Theme => "theme",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plugin" => Ok(Self::Plugin),
            "theme" => Ok(Self::Theme),
            other => Err(format!("unknown project type '{other}' (expected 'plugin' or 'theme')")),
        }
    }
}

/// How the loader treats records that share an `id`.
///
/// The index format does not enforce id uniqueness, and the original data
/// has no stated policy, so the behavior is configurable rather than
/// hard-coded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateIdPolicy {
    /// Log a warning and keep both records (the default).
    #[default]
    Warn,
    /// Reject the whole document.
    Deny,
    /// Accept silently.
    Allow,
}

/// One entry in the index describing a single installable package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    /// Identifier, unique by convention (lowercase-and-hyphen recommended).
    pub id: String,
    /// Display name shown in the workshop table.
    pub name: String,
    /// Whether this is a plugin or a theme.
    #[serde(rename = "type")]
    pub kind: ProjectType,
    /// Free-form version string; never parsed as semver.
    pub version: String,
    /// Free-form author credit.
    pub author: String,
    /// Compatibility note (e.g. `>=1.2.0`). Opaque display text; the
    /// toolkit never interprets it as a real constraint.
    pub typecho: String,
    /// Free-form description.
    pub description: String,
    /// Repository or homepage URL.
    pub link: String,
    /// Documentation page URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    /// Whether `link` points at a GitHub-hosted repository.
    #[serde(rename = "isGithub")]
    pub is_github: bool,
    /// Whether the installer may fetch and install without manual steps.
    pub direct: bool,
    /// Branch to pin installation to; absent means the default branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Path within the fetched repository holding the installable unit
    /// (monorepo sources bundle several plugins).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,
    /// Donation or sponsor page URL. The crawler writes an empty string
    /// when it finds none, so emptiness is tolerated here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donate: Option<String>,
    /// Directory name the installed package should occupy.
    pub dir: String,
}

impl ProjectRecord {
    /// Build a record from one element of the `projects` array, validating
    /// field presence, types, the `type` enum and URL syntax.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::InvalidRecord`] carrying `index`, the offending
    /// field name, and the reason.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, WorkshopError> {
        let Some(obj) = value.as_object() else {
            return Err(invalid(index, "record", "expected a JSON object"));
        };

        let id = require_nonempty(obj, index, "id")?;
        let name = require_nonempty(obj, index, "name")?;

        let kind_raw = require_str(obj, index, "type")?;
        let kind = <ProjectType as FromStr>::from_str(&kind_raw)
            .map_err(|reason| invalid(index, "type", &reason))?;

        let version = require_str(obj, index, "version")?;
        let author = require_str(obj, index, "author")?;
        let typecho = require_str(obj, index, "typecho")?;
        let description = require_str(obj, index, "description")?;

        let link = require_nonempty(obj, index, "link")?;
        validate_url(&link).map_err(|reason| invalid(index, "link", &reason))?;

        let readme = optional_str(obj, index, "readme")?;
        if let Some(url) = &readme {
            validate_url(url).map_err(|reason| invalid(index, "readme", &reason))?;
        }

        // donate may be present-but-empty in crawled data; only a non-empty
        // value has to look like a URL.
        let donate = optional_str(obj, index, "donate")?;
        if let Some(url) = &donate
            && !url.trim().is_empty()
        {
            validate_url(url).map_err(|reason| invalid(index, "donate", &reason))?;
        }

        let is_github = require_bool(obj, index, "isGithub")?;
        let direct = require_bool(obj, index, "direct")?;
        let branch = optional_str(obj, index, "branch")?;
        let subdir = optional_str(obj, index, "subdir")?;
        let dir = require_nonempty(obj, index, "dir")?;

        Ok(Self {
            id,
            name,
            kind,
            version,
            author,
            typecho,
            description,
            link,
            readme,
            is_github,
            direct,
            branch,
            subdir,
            donate,
            dir,
        })
    }
}

/// The whole index: a timestamp plus the ordered project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDocument {
    /// Calendar date (`YYYY-MM-DD`) the index was last regenerated.
    /// Informational only.
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    /// Project records in display order. Order is preserved verbatim.
    pub projects: Vec<ProjectRecord>,
}

impl IndexDocument {
    /// Parse an index document with the default duplicate-id policy.
    ///
    /// # Errors
    ///
    /// Any of the format errors described in the module docs; never a
    /// partial document.
    pub fn parse(content: &str) -> Result<Self, WorkshopError> {
        Self::parse_with_policy(content, "index document", DuplicateIdPolicy::default())
    }

    /// Parse an index document. `origin` names the source (path or URL) in
    /// error messages; `policy` governs duplicate-id handling.
    ///
    /// # Errors
    ///
    /// See [`Self::parse`]; additionally [`WorkshopError::DuplicateProjectId`]
    /// under [`DuplicateIdPolicy::Deny`].
    pub fn parse_with_policy(
        content: &str,
        origin: &str,
        policy: DuplicateIdPolicy,
    ) -> Result<Self, WorkshopError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| WorkshopError::IndexParseError {
                file: origin.to_string(),
                reason: e.to_string(),
            })?;

        let Some(obj) = value.as_object() else {
            return Err(WorkshopError::InvalidDocument {
                field: "root".to_string(),
                reason: "expected a JSON object".to_string(),
            });
        };

        let updated_at = match obj.get("updatedAt") {
            None => {
                return Err(WorkshopError::MissingField { field: "updatedAt".to_string() });
            }
            Some(Value::String(s)) => {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                    WorkshopError::InvalidDocument {
                        field: "updatedAt".to_string(),
                        reason: format!("expected a YYYY-MM-DD date, got '{s}'"),
                    }
                })?;
                s.clone()
            }
            Some(_) => {
                return Err(WorkshopError::InvalidDocument {
                    field: "updatedAt".to_string(),
                    reason: "expected a string".to_string(),
                });
            }
        };

        let raw_projects = match obj.get("projects") {
            None => {
                return Err(WorkshopError::MissingField { field: "projects".to_string() });
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(WorkshopError::InvalidDocument {
                    field: "projects".to_string(),
                    reason: "expected an array".to_string(),
                });
            }
        };

        let mut projects = Vec::with_capacity(raw_projects.len());
        for (index, item) in raw_projects.iter().enumerate() {
            projects.push(ProjectRecord::from_value(index, item)?);
        }

        check_duplicate_ids(&projects, policy)?;

        Ok(Self { updated_at, projects })
    }

    /// Read and parse an index document from a local file, default policy.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::IndexNotFound`] when the file is absent, otherwise
    /// the same errors as [`Self::parse`].
    pub fn load(path: &Path) -> Result<Self, WorkshopError> {
        Self::load_with_policy(path, DuplicateIdPolicy::default())
    }

    /// Read and parse an index document from a local file.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_policy(
        path: &Path,
        policy: DuplicateIdPolicy,
    ) -> Result<Self, WorkshopError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WorkshopError::IndexNotFound { path: path.display().to_string() }
            } else {
                WorkshopError::IoError(e)
            }
        })?;
        Self::parse_with_policy(&content, &path.display().to_string(), policy)
    }

    /// Look up a record by id, preserving the first match in document order.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look up a record by id, failing with a caller-level not-found error.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::ProjectNotFound`] when no record has the id.
    pub fn get(&self, id: &str) -> Result<&ProjectRecord, WorkshopError> {
        self.find(id).ok_or_else(|| WorkshopError::ProjectNotFound { id: id.to_string() })
    }

    /// Serialize back to the canonical on-disk form: pretty-printed JSON
    /// with a trailing newline, field order and project order preserved.
    ///
    /// # Errors
    ///
    /// [`WorkshopError::JsonError`] on serialization failure.
    pub fn to_json_string(&self) -> Result<String, WorkshopError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

fn invalid(index: usize, field: &str, reason: &str) -> WorkshopError {
    WorkshopError::InvalidRecord {
        index,
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn require_str(
    obj: &Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<String, WorkshopError> {
    match obj.get(field) {
        None => Err(invalid(index, field, "missing required field")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(invalid(index, field, &format!("expected a string, got {other}"))),
    }
}

fn require_nonempty(
    obj: &Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<String, WorkshopError> {
    let value = require_str(obj, index, field)?;
    if value.trim().is_empty() {
        return Err(invalid(index, field, "must not be empty"));
    }
    Ok(value)
}

fn optional_str(
    obj: &Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<Option<String>, WorkshopError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid(index, field, &format!("expected a string, got {other}"))),
    }
}

fn require_bool(
    obj: &Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<bool, WorkshopError> {
    match obj.get(field) {
        None => Err(invalid(index, field, "missing required field")),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(invalid(index, field, &format!("expected a boolean, got {other}"))),
    }
}

fn check_duplicate_ids(
    projects: &[ProjectRecord],
    policy: DuplicateIdPolicy,
) -> Result<(), WorkshopError> {
    if policy == DuplicateIdPolicy::Allow {
        return Ok(());
    }

    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (index, project) in projects.iter().enumerate() {
        if let Some(&first) = first_seen.get(project.id.as_str()) {
            match policy {
                DuplicateIdPolicy::Warn => {
                    tracing::warn!(
                        id = %project.id,
                        first,
                        second = index,
                        "duplicate project id in index"
                    );
                }
                DuplicateIdPolicy::Deny => {
                    return Err(WorkshopError::DuplicateProjectId {
                        id: project.id.clone(),
                        first,
                        second: index,
                    });
                }
                DuplicateIdPolicy::Allow => unreachable!(),
            }
        } else {
            first_seen.insert(project.id.as_str(), index);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "Sample",
            "type": "plugin",
            "version": "1.0.0",
            "author": "someone",
            "typecho": ">=1.2.0",
            "description": "A sample plugin",
            "link": "https://github.com/someone/sample",
            "isGithub": true,
            "direct": true,
            "dir": "Sample"
        })
    }

    fn doc_json(projects: Vec<serde_json::Value>) -> String {
        serde_json::json!({ "updatedAt": "2026-08-01", "projects": projects }).to_string()
    }

    #[test]
    fn test_parse_valid_document_preserves_order() {
        let content = doc_json(vec![record_json("b"), record_json("a")]);
        let doc = IndexDocument::parse(&content).unwrap();
        assert_eq!(doc.updated_at, "2026-08-01");
        assert_eq!(doc.projects.len(), 2);
        assert_eq!(doc.projects[0].id, "b");
        assert_eq!(doc.projects[1].id, "a");
    }

    #[test]
    fn test_empty_projects_is_valid() {
        let doc = IndexDocument::parse(&doc_json(vec![])).unwrap();
        assert!(doc.projects.is_empty());
    }

    #[test]
    fn test_missing_updated_at_fails_fast() {
        let content = r#"{"projects": []}"#;
        match IndexDocument::parse(content).unwrap_err() {
            WorkshopError::MissingField { field } => assert_eq!(field, "updatedAt"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_projects_fails_fast() {
        let content = r#"{"updatedAt": "2026-08-01"}"#;
        match IndexDocument::parse(content).unwrap_err() {
            WorkshopError::MissingField { field } => assert_eq!(field, "projects"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_date_rejected() {
        let content = r#"{"updatedAt": "August 2026", "projects": []}"#;
        match IndexDocument::parse(content).unwrap_err() {
            WorkshopError::InvalidDocument { field, .. } => assert_eq!(field, "updatedAt"),
            other => panic!("expected InvalidDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_fails_whole_load_with_index_and_field() {
        let mut bad = record_json("widgety");
        bad["type"] = serde_json::json!("widget");
        let content = doc_json(vec![record_json("ok"), bad]);
        match IndexDocument::parse(&content).unwrap_err() {
            WorkshopError::InvalidRecord { index, field, reason } => {
                assert_eq!(index, 1);
                assert_eq!(field, "type");
                assert!(reason.contains("widget"));
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field_names_the_field() {
        let mut bad = record_json("x");
        bad.as_object_mut().unwrap().remove("dir");
        let content = doc_json(vec![bad]);
        match IndexDocument::parse(&content).unwrap_err() {
            WorkshopError::InvalidRecord { index, field, .. } => {
                assert_eq!(index, 0);
                assert_eq!(field, "dir");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_mistyped_bool_rejected() {
        let mut bad = record_json("x");
        bad["direct"] = serde_json::json!("yes");
        match IndexDocument::parse(&doc_json(vec![bad])).unwrap_err() {
            WorkshopError::InvalidRecord { field, .. } => assert_eq!(field, "direct"),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_link_rejected() {
        let mut bad = record_json("x");
        bad["link"] = serde_json::json!("not-a-url");
        match IndexDocument::parse(&doc_json(vec![bad])).unwrap_err() {
            WorkshopError::InvalidRecord { field, .. } => assert_eq!(field, "link"),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_readme_rejected_when_present() {
        let mut bad = record_json("x");
        bad["readme"] = serde_json::json!("docs/README.md");
        match IndexDocument::parse(&doc_json(vec![bad])).unwrap_err() {
            WorkshopError::InvalidRecord { field, .. } => assert_eq!(field, "readme"),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_donate_tolerated() {
        let mut rec = record_json("x");
        rec["donate"] = serde_json::json!("");
        let doc = IndexDocument::parse(&doc_json(vec![rec])).unwrap();
        assert_eq!(doc.projects[0].donate.as_deref(), Some(""));
    }

    #[test]
    fn test_optional_fields_stay_absent() {
        let doc = IndexDocument::parse(&doc_json(vec![record_json("x")])).unwrap();
        let rec = &doc.projects[0];
        assert!(rec.branch.is_none());
        assert!(rec.subdir.is_none());
        assert!(rec.readme.is_none());
        assert!(rec.donate.is_none());
    }

    #[test]
    fn test_duplicate_ids_warn_by_default() {
        let content = doc_json(vec![record_json("dup"), record_json("dup")]);
        let doc = IndexDocument::parse(&content).unwrap();
        assert_eq!(doc.projects.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_deny_policy() {
        let content = doc_json(vec![record_json("dup"), record_json("dup")]);
        let err =
            IndexDocument::parse_with_policy(&content, "test", DuplicateIdPolicy::Deny)
                .unwrap_err();
        match err {
            WorkshopError::DuplicateProjectId { id, first, second } => {
                assert_eq!(id, "dup");
                assert_eq!(first, 0);
                assert_eq!(second, 1);
            }
            other => panic!("expected DuplicateProjectId, got {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let mut rec = record_json("rt");
        rec["branch"] = serde_json::json!("develop");
        rec["subdir"] = serde_json::json!("packages/rt");
        rec["readme"] = serde_json::json!("https://example.com/readme");
        let content = doc_json(vec![rec, record_json("plain")]);

        let doc = IndexDocument::parse(&content).unwrap();
        let serialized = doc.to_json_string().unwrap();
        let reparsed = IndexDocument::parse(&serialized).unwrap();
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let doc = IndexDocument::parse(&doc_json(vec![record_json("x")])).unwrap();
        assert!(doc.find("x").is_some());
        match doc.get("missing").unwrap_err() {
            WorkshopError::ProjectNotFound { id } => assert_eq!(id, "missing"),
            other => panic!("expected ProjectNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_document_rejected() {
        match IndexDocument::parse("[1, 2, 3]").unwrap_err() {
            WorkshopError::InvalidDocument { field, .. } => assert_eq!(field, "root"),
            other => panic!("expected InvalidDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_input_is_parse_error() {
        assert!(matches!(
            IndexDocument::parse("{not json").unwrap_err(),
            WorkshopError::IndexParseError { .. }
        ));
    }
}
