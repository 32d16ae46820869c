//! Core building blocks shared by every step
//!
//! - **config**: publish.toml parsing and validation
//! - **context**: the per-run `PublishContext` threaded through the pipeline
//! - **error**: error types with contextual help messages and exit codes
//! - **vcs**: git operations (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
