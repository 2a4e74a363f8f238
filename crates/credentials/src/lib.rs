//! Saved credentials for the DAHOUSE desktop client.
//!
//! Credentials are kept in a single JSON record whose fields are base64
//! encoded. The encoding is reversible and offers no secrecy; anyone with
//! read access to the file can recover the password.

pub mod codec;
pub mod store;

pub use codec::{DecodeError, decode, encode};
pub use store::{CredentialRecord, CredentialStore, Credentials, PersistenceError};
