//! Core types for the Workshop toolkit.
//!
//! This module provides the foundation used by every other module:
//! the strongly-typed error enum, the user-facing error context wrapper,
//! and the boundary conversion used by the CLI entry point.
//!
//! The error design follows two principles:
//! - **Strongly-typed errors** ([`WorkshopError`]) for precise handling in code
//! - **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!   for CLI users
//!
//! Format errors (a malformed index document) fail the whole load. Resolution
//! errors are scoped to a single record. Unknown-id lookups are a caller-level
//! condition. See [`error`] for the full taxonomy.

pub mod error;

pub use error::{ErrorContext, WorkshopError, user_friendly_error};
