//! Common test utilities and fixtures for Workshop integration tests.

// Allow dead code because these utilities are shared across test files and
// not every test file uses all of them
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// An isolated workspace: a temp directory holding an index file and an
/// (initially absent) config file the binary is pointed at, so the user's
/// real `~/.workshop/config.toml` never leaks into a test.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("create temp dir") }
    }

    /// Write an index document and return its path.
    pub fn write_index(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("repo.json");
        fs::write(&path, content).expect("write index");
        path
    }

    /// Write a config file and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.dir.path().join("config.toml");
        fs::write(&path, content).expect("write config");
        path
    }

    /// Path of the (possibly absent) config file in this workspace.
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Build a `workshop` command wired to this workspace's config.
    pub fn workshop(&self) -> Command {
        let mut cmd = Command::cargo_bin("workshop").expect("workshop binary");
        cmd.env("WORKSHOP_CONFIG", self.config_path());
        cmd.env_remove("GITHUB_TOKEN");
        cmd.env_remove("GH_TOKEN");
        cmd
    }
}

/// A small but representative index: the three resolver modes, a theme,
/// and a record with an unsafe install dir.
pub fn sample_index() -> String {
    serde_json::json!({
        "updatedAt": "2026-08-01",
        "projects": [
            {
                "id": "medialibrary-pro",
                "name": "MediaLibrary Pro",
                "type": "plugin",
                "version": "1.2.0",
                "author": "HansJack",
                "typecho": ">=1.2.0",
                "description": "Media library management",
                "link": "https://github.com/TGU-HansJack/MediaLibrary-Typecho-Plugin-Pro",
                "isGithub": true,
                "direct": true,
                "dir": "MediaLibrary-Pro"
            },
            {
                "id": "bscore",
                "name": "BsCore",
                "type": "plugin",
                "version": "2.0",
                "author": "whitebearcode",
                "typecho": "",
                "description": "Companion core plugin",
                "link": "https://github.com/whitebearcode/typecho-bearsimple",
                "isGithub": true,
                "direct": true,
                "subdir": "配套插件/BsCore",
                "dir": "BsCore"
            },
            {
                "id": "theme-mirages",
                "name": "Mirages",
                "type": "theme",
                "version": "7.0",
                "author": "someone",
                "typecho": ">=1.1.0",
                "description": "A clean theme",
                "link": "https://github.com/someone/mirages",
                "readme": "https://example.com/mirages-docs",
                "isGithub": true,
                "direct": false,
                "dir": "Mirages"
            },
            {
                "id": "offsite-pack",
                "name": "Offsite Pack",
                "type": "plugin",
                "version": "0.9",
                "author": "vendor",
                "typecho": "",
                "description": "Distributed outside GitHub",
                "link": "https://vendor.example.com/pack.zip",
                "isGithub": false,
                "direct": true,
                "dir": "OffsitePack"
            },
            {
                "id": "escape-artist",
                "name": "Escape Artist",
                "type": "plugin",
                "version": "0.1",
                "author": "nobody",
                "typecho": "",
                "description": "Record with an unsafe install dir",
                "link": "https://github.com/nobody/escape",
                "isGithub": true,
                "direct": true,
                "dir": "../../etc"
            }
        ]
    })
    .to_string()
}
