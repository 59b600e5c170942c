//! Error handling for the Workshop toolkit.
//!
//! The error system is built around two types:
//! - [`WorkshopError`] - strongly-typed errors for every failure case
//! - [`ErrorContext`] - wrapper that adds user-friendly suggestions and details
//!
//! # Error Categories
//!
//! - **Format errors**: the index document is structurally invalid.
//!   [`WorkshopError::MissingField`], [`WorkshopError::InvalidDocument`],
//!   [`WorkshopError::InvalidRecord`], [`WorkshopError::IndexParseError`].
//!   These fail the whole load; no partial document is ever returned.
//! - **Resolution errors**: a single record cannot be turned into an
//!   installation plan. [`WorkshopError::UnsafePath`]. Scoped to one record;
//!   the rest of the loaded document stays valid.
//! - **Lookup**: [`WorkshopError::ProjectNotFound`] is a caller-level
//!   condition, not a loader or resolver failure.
//! - **Ambient**: fetching ([`WorkshopError::FetchError`]), the GitHub crawl
//!   ([`WorkshopError::GithubApiError`], [`WorkshopError::RateLimited`]),
//!   configuration, and conversions from [`std::io::Error`],
//!   [`serde_json::Error`], [`toml::de::Error`] and [`reqwest::Error`].
//!
//! Use [`user_friendly_error`] at the binary boundary to convert any error
//! into a colored, actionable message. The core itself never swallows or
//! logs-and-ignores an error.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for Workshop operations.
///
/// Each variant carries enough context (record index, field name, offending
/// value) for the user to fix the source document without re-running with
/// extra diagnostics.
#[derive(Error, Debug)]
pub enum WorkshopError {
    /// Index document not found at the given path
    #[error("Index file not found: {path}")]
    IndexNotFound {
        /// Path that was expected to contain the index document
        path: String,
    },

    /// The index document is not parseable JSON
    #[error("Invalid index document syntax in {file}")]
    IndexParseError {
        /// Location of the document that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// A required top-level field is absent from the index document
    #[error("Index document is missing required field '{field}'")]
    MissingField {
        /// Name of the missing top-level field
        field: String,
    },

    /// A top-level field is present but malformed
    #[error("Index document field '{field}' is invalid: {reason}")]
    InvalidDocument {
        /// Name of the malformed top-level field
        field: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// A project record violates the schema; fails the whole load
    #[error("Invalid project record at index {index}: field '{field}': {reason}")]
    InvalidRecord {
        /// Zero-based position of the record in the `projects` array
        index: usize,
        /// Name of the offending field
        field: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// Two records share an id and the duplicate-id policy is `deny`
    #[error("Duplicate project id '{id}' (records {first} and {second})")]
    DuplicateProjectId {
        /// The colliding id value
        id: String,
        /// Position of the first record with this id
        first: usize,
        /// Position of the later record with this id
        second: usize,
    },

    /// No record with the requested id exists in the document
    #[error("Project '{id}' not found in the index")]
    ProjectNotFound {
        /// The id that was looked up
        id: String,
    },

    /// A path field fails the filesystem-safety check
    #[error("Unsafe path in field '{field}': {value}")]
    UnsafePath {
        /// Name of the field holding the unsafe value (`dir` or `subdir`)
        field: String,
        /// The offending path value
        value: String,
    },

    /// Fetching the index document over HTTP failed
    #[error("Failed to fetch index from {url}")]
    FetchError {
        /// URL of the index document
        url: String,
        /// Reason for the fetch failure
        reason: String,
    },

    /// A GitHub API request failed during a crawl
    #[error("GitHub API request failed: {operation}")]
    GithubApiError {
        /// The API operation that failed (e.g. "search repositories")
        operation: String,
        /// Reason for the failure
        reason: String,
    },

    /// The GitHub API rate limit was exhausted
    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    /// Configuration file or option error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error outside of index loading (serialization, API payloads)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error from the configuration file
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for WorkshopError {
    fn clone(&self) -> Self {
        match self {
            Self::IndexNotFound { path } => Self::IndexNotFound { path: path.clone() },
            Self::IndexParseError { file, reason } => Self::IndexParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::MissingField { field } => Self::MissingField { field: field.clone() },
            Self::InvalidDocument { field, reason } => Self::InvalidDocument {
                field: field.clone(),
                reason: reason.clone(),
            },
            Self::InvalidRecord { index, field, reason } => Self::InvalidRecord {
                index: *index,
                field: field.clone(),
                reason: reason.clone(),
            },
            Self::DuplicateProjectId { id, first, second } => Self::DuplicateProjectId {
                id: id.clone(),
                first: *first,
                second: *second,
            },
            Self::ProjectNotFound { id } => Self::ProjectNotFound { id: id.clone() },
            Self::UnsafePath { field, value } => Self::UnsafePath {
                field: field.clone(),
                value: value.clone(),
            },
            Self::FetchError { url, reason } => Self::FetchError {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::GithubApiError { operation, reason } => Self::GithubApiError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::RateLimited => Self::RateLimited,
            Self::ConfigError { message } => Self::ConfigError { message: message.clone() },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other { message: format!("IO error: {e}") },
            Self::JsonError(e) => Self::Other { message: format!("JSON error: {e}") },
            Self::TomlError(e) => Self::Other { message: format!("TOML parsing error: {e}") },
            Self::HttpError(e) => Self::Other { message: format!("HTTP error: {e}") },
            Self::Other { message } => Self::Other { message: message.clone() },
        }
    }
}

/// A [`WorkshopError`] enriched with a suggestion and details for CLI display.
///
/// The suggestion is an actionable step (shown green), the details explain
/// why the error occurred (shown yellow). Both are optional.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: WorkshopError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: WorkshopError) -> Self {
        Self { error, suggestion: None, details: None }
    }

    /// Add an actionable suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Downcasts known error types and attaches contextual suggestions. Unknown
/// errors pass through as [`WorkshopError::Other`] with the full message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(workshop_error) = error.downcast_ref::<WorkshopError>() {
        return create_error_context(workshop_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(WorkshopError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership or run with elevated permissions");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(WorkshopError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(WorkshopError::IndexParseError {
            file: "repo.json".to_string(),
            reason: json_error.to_string(),
        })
        .with_suggestion("Check the JSON syntax: quotes, commas and brackets must balance")
        .with_details("The index document must be a JSON object with 'updatedAt' and 'projects'");
    }

    ErrorContext::new(WorkshopError::Other { message: error.to_string() })
}

fn create_error_context(error: WorkshopError) -> ErrorContext {
    match &error {
        WorkshopError::IndexNotFound { path } => {
            let suggestion =
                format!("Check that '{path}' exists, or pass the index location explicitly");
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "Workshop reads a repo.json document from a local path or an http(s) URL",
            )
        }

        WorkshopError::IndexParseError { file, .. } => {
            let suggestion = format!(
                "Check the JSON syntax in {file}. Common issues: trailing commas, unquoted keys, truncated downloads"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        WorkshopError::MissingField { field } => {
            let details = format!(
                "Every index document needs a top-level '{field}' entry; see the repo.json schema in the README"
            );
            ErrorContext::new(error)
                .with_suggestion("Add the missing field to the index document")
                .with_details(details)
        }

        WorkshopError::InvalidRecord { index, .. } => {
            let suggestion = format!(
                "Fix the record at position {index} in the 'projects' array; the whole document is rejected until it conforms"
            );
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "Loading is fail-fast: a malformed record is an authoring error, not something to skip silently",
            )
        }

        WorkshopError::DuplicateProjectId { id, .. } => {
            let suggestion = format!(
                "Rename one of the records with id '{id}', or set duplicate_ids = \"allow\" in the config"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        WorkshopError::ProjectNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'workshop list' to see the ids available in the index"),

        WorkshopError::UnsafePath { .. } => ErrorContext::new(error).with_details(
            "Install paths must be relative and must not contain parent-directory segments",
        ),

        WorkshopError::FetchError { .. } => ErrorContext::new(error)
            .with_suggestion("Check your internet connection and that the index URL is reachable"),

        WorkshopError::RateLimited => ErrorContext::new(error).with_suggestion(
            "Set the GITHUB_TOKEN environment variable to raise the API rate limit",
        ),

        WorkshopError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check ~/.workshop/config.toml or the path given via --config"),

        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_record_message_names_index_and_field() {
        let err = WorkshopError::InvalidRecord {
            index: 3,
            field: "type".to_string(),
            reason: "unknown value 'widget'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("index 3"));
        assert!(msg.contains("'type'"));
        assert!(msg.contains("widget"));
    }

    #[test]
    fn test_clone_degrades_io_error_to_other() {
        let err = WorkshopError::IoError(std::io::Error::other("boom"));
        match err.clone() {
            WorkshopError::Other { message } => assert!(message.contains("boom")),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn test_error_context_display_format() {
        let ctx = ErrorContext::new(WorkshopError::ProjectNotFound { id: "foo".to_string() })
            .with_suggestion("list the index")
            .with_details("caller-level lookup");
        let rendered = format!("{ctx}");
        assert!(rendered.contains("Project 'foo' not found"));
        assert!(rendered.contains("Suggestion: list the index"));
        assert!(rendered.contains("Details: caller-level lookup"));
    }

    #[test]
    fn test_user_friendly_error_downcasts_workshop_error() {
        let err = anyhow::Error::from(WorkshopError::RateLimited);
        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, WorkshopError::RateLimited));
        assert!(ctx.suggestion.unwrap().contains("GITHUB_TOKEN"));
    }
}
