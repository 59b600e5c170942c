//! Install-path safety checks and URL syntax validation.
//!
//! The toolkit never touches the real filesystem on behalf of a record, so
//! these checks are purely lexical: they reject values that could escape the
//! installation root once an external installer concatenates them, without
//! canonicalizing or normalizing anything. A rejected path is an error, never
//! a silently-cleaned value.

use crate::core::WorkshopError;
use std::path::{Component, Path};

/// Validate that a repository-relative path contains no traversal segments.
///
/// Used for `subdir`: the value is concatenated onto the fetched tree root by
/// the installer, so `..` components and absolute paths are rejected.
/// Forward slashes are fine; a subdirectory may be nested (and non-ASCII,
/// monorepo sources in the wild use both).
///
/// # Errors
///
/// Returns [`WorkshopError::UnsafePath`] naming `field` when the value
/// contains a parent-directory segment or is absolute.
pub fn validate_no_traversal(field: &str, value: &str) -> Result<(), WorkshopError> {
    for component in Path::new(value).components() {
        match component {
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(WorkshopError::UnsafePath {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validate that a target directory name is a single, safe path segment.
///
/// The `dir` field becomes the directory the installed package occupies, so
/// it must be exactly one relative segment: no separators, no traversal, no
/// NUL. Emptiness is checked by the loader; this check guards resolution.
///
/// # Errors
///
/// Returns [`WorkshopError::UnsafePath`] naming `field` on violation.
pub fn validate_dir_segment(field: &str, value: &str) -> Result<(), WorkshopError> {
    let unsafe_path = || WorkshopError::UnsafePath {
        field: field.to_string(),
        value: value.to_string(),
    };

    if value.is_empty() || value == "." || value == ".." {
        return Err(unsafe_path());
    }
    if value.contains('/') || value.contains('\\') || value.contains('\0') {
        return Err(unsafe_path());
    }
    Ok(())
}

/// Check that a string is a syntactically plausible `http(s)` URL.
///
/// The index only ever references web pages and GitHub repositories, so the
/// check is scheme + non-empty host + no whitespace. Full RFC 3986 parsing
/// is not the loader's job.
///
/// # Errors
///
/// Returns a human-readable reason; the loader wraps it into the record-level
/// format error with index and field attached.
pub fn validate_url(value: &str) -> Result<(), String> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .ok_or_else(|| format!("expected an http(s) URL, got '{value}'"))?;

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(format!("URL '{value}' has no host"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(format!("URL '{value}' contains whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_no_traversal() {
        // Valid paths
        assert!(validate_no_traversal("subdir", "foo/bar").is_ok());
        assert!(validate_no_traversal("subdir", "./relative").is_ok());
        assert!(validate_no_traversal("subdir", "配套插件/BsCore").is_ok());

        // Invalid paths
        assert!(validate_no_traversal("subdir", "../parent").is_err());
        assert!(validate_no_traversal("subdir", "foo/../bar").is_err());
        assert!(validate_no_traversal("subdir", "/absolute").is_err());
    }

    #[test]
    fn test_validate_dir_segment() {
        assert!(validate_dir_segment("dir", "MediaLibrary-Pro").is_ok());
        assert!(validate_dir_segment("dir", "BsCore").is_ok());

        assert!(validate_dir_segment("dir", "").is_err());
        assert!(validate_dir_segment("dir", "..").is_err());
        assert!(validate_dir_segment("dir", "../../etc").is_err());
        assert!(validate_dir_segment("dir", "nested/dir").is_err());
        assert!(validate_dir_segment("dir", "back\\slash").is_err());
    }

    #[test]
    fn test_validate_dir_segment_error_names_field() {
        let err = validate_dir_segment("dir", "../../etc").unwrap_err();
        match err {
            WorkshopError::UnsafePath { field, value } => {
                assert_eq!(field, "dir");
                assert_eq!(value, "../../etc");
            }
            other => panic!("expected UnsafePath, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://github.com/owner/repo").is_ok());
        assert!(validate_url("http://example.com").is_ok());

        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("github.com/owner/repo").is_err());
        assert!(validate_url("https:///no-host").is_err());
        assert!(validate_url("https://exa mple.com").is_err());
    }
}
