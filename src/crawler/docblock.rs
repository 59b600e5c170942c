//! PHP docblock metadata extraction.
//!
//! Typecho plugins and themes carry their metadata in the first `/** ... */`
//! block of `Plugin.php` / `index.php`: a description line followed by
//! `@package`, `@author`, `@version` and `@link` tags. The crawler reads
//! that block straight out of the raw file text; there is no PHP parsing
//! involved, only line scanning and a few anchored regexes.

use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@package\s+(.+)").unwrap());
static AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^@author\s+(.+)").unwrap());
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@version\s+(.+)").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^@link\s+(.+)").unwrap());
static CLASS_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclass\s+([A-Za-z0-9_]+)_Plugin\b").unwrap());
static VERSION_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").unwrap());
static VERSION_JUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z.+-]").unwrap());

/// Metadata pulled from the leading docblock. Missing tags stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocblockMeta {
    /// `@package` tag value.
    pub package: String,
    /// `@author` tag value.
    pub author: String,
    /// `@version` tag value, raw (see [`clean_version`]).
    pub version: String,
    /// `@link` tag value.
    pub link: String,
    /// First non-empty, non-tag line of the block.
    pub description: String,
}

/// Take the first `/** ... */` block from the head of a PHP file.
///
/// Only the first 8 KiB are inspected; real metadata blocks sit at the top
/// of the file and scanning further just reads code.
#[must_use]
pub fn first_docblock(text: &str) -> Option<&str> {
    let head = truncate_at_boundary(text, 8_000);
    let start = head.find("/**")?;
    let end = head[start..].find("*/")? + start;
    Some(&head[start..end + 2])
}

/// Parse a docblock into [`DocblockMeta`]. The first tag occurrence wins.
#[must_use]
pub fn parse_docblock(doc: &str) -> DocblockMeta {
    let lines: Vec<String> = doc
        .lines()
        .map(|raw| {
            let mut line = raw.trim();
            line = line.strip_prefix("/**").unwrap_or(line);
            line = line.strip_suffix("*/").unwrap_or(line);
            line.trim_start_matches('*').trim().to_string()
        })
        .collect();

    let description = lines
        .iter()
        .find(|line| !line.is_empty() && !line.starts_with('@'))
        .cloned()
        .unwrap_or_default();

    let mut meta = DocblockMeta { description, ..DocblockMeta::default() };

    for line in &lines {
        if meta.package.is_empty()
            && let Some(cap) = PACKAGE_RE.captures(line)
        {
            meta.package = cap[1].trim().to_string();
            continue;
        }
        if meta.author.is_empty()
            && let Some(cap) = AUTHOR_RE.captures(line)
        {
            meta.author = cap[1].trim().to_string();
            continue;
        }
        if meta.version.is_empty()
            && let Some(cap) = VERSION_RE.captures(line)
        {
            meta.version = cap[1].trim().to_string();
            continue;
        }
        if meta.link.is_empty()
            && let Some(cap) = LINK_RE.captures(line)
        {
            meta.link = cap[1].trim().to_string();
        }
    }

    meta
}

/// Find the `<Prefix>_Plugin` class name prefix near the top of the file.
///
/// Typecho derives the plugin's install directory from this prefix, so it
/// is a better `dir` candidate than the repository name.
#[must_use]
pub fn extract_class_prefix(text: &str) -> Option<String> {
    let head = truncate_at_boundary(text, 16_000);
    CLASS_PREFIX_RE.captures(head).map(|cap| cap[1].trim().to_string())
}

/// Reduce a free-form `@version` value to a bare version string.
///
/// Prefers the first `X.Y` / `X.Y.Z` group; otherwise strips a leading
/// `v`, turns underscores into dots and drops anything exotic.
#[must_use]
pub fn clean_version(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Some(cap) = VERSION_DIGITS_RE.captures(trimmed) {
        return cap[1].to_string();
    }
    let stripped = trimmed.trim_start_matches(['v', 'V']).replace('_', ".");
    VERSION_JUNK_RE.replace_all(&stripped, "").to_string()
}

/// Cut `text` to at most `limit` bytes without splitting a UTF-8 character.
fn truncate_at_boundary(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PLUGIN: &str = r#"<?php
/**
 * A media library for your blog
 *
 * @package MediaLibrary
 * @author HansJack
 * @version v1.2.0
 * @link https://hansjack.example.com
 */
class MediaLibrary_Plugin implements Typecho_Plugin_Interface
{
}
"#;

    #[test]
    fn test_first_docblock_extracts_leading_block() {
        let doc = first_docblock(SAMPLE_PLUGIN).unwrap();
        assert!(doc.starts_with("/**"));
        assert!(doc.ends_with("*/"));
        assert!(doc.contains("@package MediaLibrary"));
    }

    #[test]
    fn test_first_docblock_absent() {
        assert!(first_docblock("<?php echo 'no docblock';").is_none());
    }

    #[test]
    fn test_parse_docblock_fields() {
        let meta = parse_docblock(first_docblock(SAMPLE_PLUGIN).unwrap());
        assert_eq!(meta.description, "A media library for your blog");
        assert_eq!(meta.package, "MediaLibrary");
        assert_eq!(meta.author, "HansJack");
        assert_eq!(meta.version, "v1.2.0");
        assert_eq!(meta.link, "https://hansjack.example.com");
    }

    #[test]
    fn test_parse_docblock_first_tag_wins() {
        let doc = "/**\n * @version 1.0\n * @version 2.0\n */";
        assert_eq!(parse_docblock(doc).version, "1.0");
    }

    #[test]
    fn test_extract_class_prefix() {
        assert_eq!(extract_class_prefix(SAMPLE_PLUGIN).as_deref(), Some("MediaLibrary"));
        assert!(extract_class_prefix("<?php class Foo {}").is_none());
    }

    #[test]
    fn test_clean_version() {
        assert_eq!(clean_version("v1.2.0"), "1.2.0");
        assert_eq!(clean_version("version 2.5"), "2.5");
        assert_eq!(clean_version("1_0"), "1.0");
        assert_eq!(clean_version("beta!"), "beta");
        assert_eq!(clean_version(""), "");
    }

    #[test]
    fn test_truncate_on_multibyte_text() {
        let text = "配".repeat(10_000);
        // Must not panic on a non-boundary cut.
        let _ = first_docblock(&text);
    }
}
