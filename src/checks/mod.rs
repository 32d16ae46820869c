//! Preflight checks run before anything is tagged or uploaded
//!
//! - **tools**: every configured external program resolves on PATH

pub mod tools;

pub use tools::check_required_tools;
