//! Workshop - Typecho plugin/theme index toolkit
//!
//! The Workshop index is a single static JSON document (`repo.json`)
//! enumerating third-party plugins and themes for the Typecho workshop
//! feature. The document is hand-curated and crawler-grown, published on a
//! raw-file host, and consumed read-only by an administration panel.
//!
//! This crate is the toolkit around that document:
//! - **load and validate** the index (fail-fast, whole-document, with
//!   record-level diagnostics),
//! - **resolve** a record into the concrete installation plan an external
//!   installer executes,
//! - **list** records for display,
//! - **crawl** GitHub to discover new plugins/themes and merge them in.
//!
//! # Architecture Overview
//!
//! The core is two pure functions. The loader maps raw text to a validated
//! [`index::IndexDocument`] or a format error; the resolver maps one record
//! to a mode-tagged [`resolver::InstallPlan`] or a resolution error. I/O
//! (HTTP fetch, GitHub crawl) lives at the edges.
//!
//! # Core Modules
//!
//! - [`index`] - document model and the fail-fast loader
//! - [`resolver`] - installation plan resolution
//! - [`source`] - index retrieval from local paths and raw-file URLs
//! - [`crawler`] - GitHub discovery and index merging
//! - [`cli`] - command-line interface (`validate`, `resolve`, `list`, `crawl`)
//! - [`config`] - global configuration (`~/.workshop/config.toml`)
//! - [`core`] - error types and user-facing error contexts
//! - [`constants`] / [`utils`] - shared constants and helpers
//!
//! # Index Format (repo.json)
//!
//! ```json
//! {
//!   "updatedAt": "2026-08-01",
//!   "projects": [
//!     {
//!       "id": "plugin-medialibrary",
//!       "name": "MediaLibrary",
//!       "type": "plugin",
//!       "version": "1.2.0",
//!       "author": "HansJack",
//!       "typecho": ">=1.2.0",
//!       "description": "A media library for your blog",
//!       "link": "https://github.com/TGU-HansJack/MediaLibrary-Typecho-Plugin-Pro",
//!       "isGithub": true,
//!       "direct": true,
//!       "dir": "MediaLibrary"
//!     }
//!   ]
//! }
//! ```
//!
//! Optional fields (`readme`, `branch`, `subdir`, `donate`) are absent
//! rather than null or empty, so "not specified" stays distinguishable
//! from "explicitly empty".
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Validate the published index
//! workshop validate
//!
//! # Validate a local copy before committing it
//! workshop validate ./repo.json --strict
//!
//! # Show how a record would be installed
//! workshop resolve plugin-medialibrary
//!
//! # Grow the index from GitHub
//! workshop crawl ./repo.json --plugins 40
//! ```

// Core functionality
pub mod constants;
pub mod core;
pub mod index;
pub mod resolver;

// Index retrieval and maintenance
pub mod crawler;
pub mod source;

// Supporting modules
pub mod cli;
pub mod config;
pub mod utils;
