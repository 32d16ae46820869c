//! CLI commands for dmod-release
//!
//! - **publish**: verify, tag and upload a release (the only command)

pub mod publish;

pub use publish::run_publish;
