//! Update checks against a release-metadata endpoint.
//!
//! The endpoint is expected to answer like GitHub's
//! `GET /repos/{owner}/{repo}/releases/latest`.

pub mod checker;
pub mod types;
pub mod version;

pub use checker::{CheckError, UpdateChecker, UpdateConfig};
pub use types::{ReleaseInfo, UpdateStatus};
pub use version::{VersionOrdering, is_newer};
