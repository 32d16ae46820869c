//! Release publishing
//!
//! - **version**: reads the release version from the version file
//! - **pipeline**: verifies artifacts, tags, uploads and updates `latest`
//!
//! # Example publish.toml
//!
//! ```toml
//! version_file = "version"
//! remote_root = "/Joyent_Dev/public/mdb_v8"
//!
//! [[artifacts]]
//! arch = "amd64"
//! path = "build/amd64/mdb_v8.so"
//! name = "mdb_v8_amd64.so"
//! ```

pub mod pipeline;
pub mod version;

pub use pipeline::{PublishOutcome, Publisher, follow_up_text};
pub use version::load_version;
