use predicates::prelude::*;

mod common;
use common::{TestWorkspace, sample_index};

/// A direct GitHub record without branch/subdir resolves to DirectFetch
/// with the "default" branch sentinel and the repository root.
#[test]
fn test_resolve_direct_fetch_defaults() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["resolve", "medialibrary-pro", index.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode:       DirectFetch"))
        .stdout(predicate::str::contains(
            "https://github.com/TGU-HansJack/MediaLibrary-Typecho-Plugin-Pro",
        ))
        .stdout(predicate::str::contains("branch:     default"))
        .stdout(predicate::str::contains("(repository root)"))
        .stdout(predicate::str::contains("target dir: MediaLibrary-Pro"));
}

/// A monorepo record keeps its subdir verbatim in the plan.
#[test]
fn test_resolve_monorepo_subdir_json() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["resolve", "bscore", index.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mode\": \"DirectFetch\""))
        .stdout(predicate::str::contains("\"subdir\": \"配套插件/BsCore\""))
        .stdout(predicate::str::contains("\"targetDir\": \"BsCore\""));
}

/// Non-GitHub records always resolve to a generic link.
#[test]
fn test_resolve_non_github_generic_link() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["resolve", "offsite-pack", index.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode:       GenericLink"))
        .stdout(predicate::str::contains("https://vendor.example.com/pack.zip"));
}

/// GitHub records that are not directly installable surface the link for
/// manual handling.
#[test]
fn test_resolve_manual_fetch() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["resolve", "theme-mirages", index.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode:       ManualFetch"));
}

/// A traversal dir is a resolution error, never a normalized plan.
#[test]
fn test_resolve_unsafe_dir_rejected() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["resolve", "escape-artist", index.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsafe path"))
        .stderr(predicate::str::contains("../../etc"));
}

/// Unknown ids are a lookup failure, with a pointer to `list`.
#[test]
fn test_resolve_unknown_id() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());

    ws.workshop()
        .args(["resolve", "no-such-plugin", index.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'no-such-plugin' not found"))
        .stderr(predicate::str::contains("workshop list"));
}

/// The configured index_url is used when no index argument is given.
#[test]
fn test_resolve_uses_configured_index() {
    let ws = TestWorkspace::new();
    let index = ws.write_index(&sample_index());
    ws.write_config(&format!("index_url = {:?}\n", index.to_str().unwrap()));

    ws.workshop()
        .args(["resolve", "medialibrary-pro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DirectFetch"));
}
