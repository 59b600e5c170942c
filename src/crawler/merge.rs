//! Merging crawled records into an existing index.
//!
//! The index is hand-curated as well as crawled, so merging is conservative:
//! existing records are matched by `link` and only have blank fields filled
//! in, new records are appended with collision-free ids, and document order
//! is never disturbed. The one exception is the install `dir`: a crawl that
//! detected a proper directory name (from `@package` or the plugin class
//! prefix) corrects an existing guess.

use crate::index::ProjectRecord;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap());
static SLUG_JUNK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static SLUG_DASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());
static SANITIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").unwrap());

/// What a merge did, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records appended to the index.
    pub added: usize,
    /// Existing records that had fields filled or fixed.
    pub updated: usize,
}

/// Whether a string is usable as an install directory name.
#[must_use]
pub fn is_valid_dir(s: &str) -> bool {
    DIR_RE.is_match(s)
}

/// Lowercase, hyphen-separated slug of a display string.
#[must_use]
pub fn slugify(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let dashed = SLUG_JUNK_RE.replace_all(&lowered, "-");
    SLUG_DASHES_RE.replace_all(&dashed, "-").trim_matches('-').to_string()
}

/// Best-effort reduction of a display string to a valid directory name.
#[must_use]
pub fn sanitize_dir(s: &str) -> String {
    SANITIZE_RE.replace_all(s, "-").trim_matches('-').to_string()
}

/// Merge crawled records into the existing project list, in place.
///
/// Records are keyed by `link`. For an existing match, blank string fields
/// (`version`, `typecho`, `author`, `description`) and an absent `donate`
/// are filled from the crawl, and a detected valid `dir` replaces a
/// differing one. Unmatched records are appended with a unique id.
pub fn merge_projects(existing: &mut Vec<ProjectRecord>, incoming: Vec<ProjectRecord>) -> MergeStats {
    let mut by_link: HashMap<String, usize> = HashMap::new();
    for (pos, record) in existing.iter().enumerate() {
        by_link.entry(record.link.trim().to_string()).or_insert(pos);
    }

    let mut used_ids: HashSet<String> = existing.iter().map(|r| r.id.clone()).collect();
    let mut stats = MergeStats::default();

    for record in incoming {
        let link = record.link.trim().to_string();
        if link.is_empty() {
            continue;
        }

        if let Some(&pos) = by_link.get(&link) {
            if fill_existing(&mut existing[pos], &record) {
                stats.updated += 1;
            }
            continue;
        }

        let mut record = record;
        record.id = unique_id(&mut used_ids, &record.id);
        by_link.insert(link, existing.len());
        existing.push(record);
        stats.added += 1;
    }

    stats
}

fn fill_existing(current: &mut ProjectRecord, incoming: &ProjectRecord) -> bool {
    let mut changed = false;

    if !incoming.dir.is_empty() && is_valid_dir(&incoming.dir) && current.dir != incoming.dir {
        current.dir = incoming.dir.clone();
        changed = true;
    }

    let fills: [(&mut String, &String); 4] = [
        (&mut current.version, &incoming.version),
        (&mut current.typecho, &incoming.typecho),
        (&mut current.author, &incoming.author),
        (&mut current.description, &incoming.description),
    ];
    for (field, candidate) in fills {
        if field.is_empty() && !candidate.is_empty() {
            *field = candidate.clone();
            changed = true;
        }
    }

    if current.donate.is_none() && incoming.donate.is_some() {
        current.donate = incoming.donate.clone();
        changed = true;
    }

    changed
}

fn unique_id(used: &mut HashSet<String>, base: &str) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
