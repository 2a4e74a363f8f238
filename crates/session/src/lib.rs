//! Session client for the DAHOUSE API.
//!
//! [`ApiClient`] is the cloneable HTTP transport for `/login` and `/user`.
//! [`SessionClient`] wraps it, builds detached requests for worker tasks,
//! and holds the bearer token for the duration of a session. Logging out is
//! local only; the server is never told.

pub mod client;
pub mod session;
pub mod types;

pub use client::{ApiClient, ApiConfig, AuthError, FetchError};
pub use session::{SessionClient, SessionFuture};
pub use types::{AccessToken, FieldValue, ProfileField, UserProfile};
