//! On-disk credential record.
//!
//! The record is a JSON object with two base64 fields. Its presence means
//! "remember me" was set on the last successful login.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec;

/// Errors from reading or writing the credential record.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Plain-text username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Persisted form of [`Credentials`], each field base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,
}

impl CredentialRecord {
    /// Encodes plain credentials into the persisted form.
    pub fn encode(credentials: &Credentials) -> Self {
        Self {
            username: codec::encode(&credentials.username),
            password: codec::encode(&credentials.password),
        }
    }

    /// Decodes the persisted form back into plain credentials.
    pub fn decode(&self) -> Result<Credentials, codec::DecodeError> {
        Ok(Credentials {
            username: codec::decode(&self.username)?,
            password: codec::decode(&self.password)?,
        })
    }
}

/// Single-record credential store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store for the record at `path`. Nothing is read until
    /// [`load`](Self::load) is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the record, replacing any previous one.
    pub fn save(&self, credentials: &Credentials) -> Result<(), PersistenceError> {
        let record = CredentialRecord::encode(credentials);
        let json = serde_json::to_string(&record)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        write_owner_only(&self.path, json.as_bytes())?;

        debug!(path = %self.path.display(), "saved credentials");
        Ok(())
    }

    /// Reads the record.
    ///
    /// Returns `Ok(None)` when there is no record, and also when the record
    /// exists but cannot be parsed or decoded. Only I/O failures are errors.
    pub fn load(&self) -> Result<Option<Credentials>, PersistenceError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: CredentialRecord = match serde_json::from_str(&data) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring malformed credential record: {e}");
                return Ok(None);
            }
        };

        match record.decode() {
            Ok(credentials) => {
                debug!(path = %self.path.display(), "loaded saved credentials");
                Ok(Some(credentials))
            }
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring undecodable credential record: {e}");
                Ok(None)
            }
        }
    }

    /// Deletes the record. Succeeds if there was nothing to delete.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared saved credentials");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Writes `data` to `path` without the file ever being readable by others.
///
/// A new file is created as 0600. An existing file is narrowed to 0600 before
/// its contents are replaced.
#[cfg(unix)]
fn write_owner_only(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.set_len(0)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, data: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, data)
}
