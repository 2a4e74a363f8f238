//! Release metadata types.

use serde::{Deserialize, Serialize};

/// Wire shape of the release endpoint. Extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestRelease {
    pub tag_name: String,
    pub html_url: String,
}

/// The newest published release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub version: String,
    /// Page where the release can be downloaded.
    pub download_url: String,
}

impl From<LatestRelease> for ReleaseInfo {
    fn from(release: LatestRelease) -> Self {
        Self {
            version: release.tag_name,
            download_url: release.html_url,
        }
    }
}

/// Result of comparing the latest release with the running version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Available(ReleaseInfo),
    UpToDate { current: String },
}

impl UpdateStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, UpdateStatus::Available(_))
    }
}
