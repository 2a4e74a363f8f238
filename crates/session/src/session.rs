//! In-memory session state.

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::client::{ApiClient, AuthError, FetchError};
use crate::types::{AccessToken, UserProfile};

/// A request that owns everything it needs, so it can run on another task.
pub type SessionFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Holds the bearer token between a successful login and logout.
///
/// The token never leaves memory. [`login`](Self::login) and
/// [`fetch_profile`](Self::fetch_profile) return detached requests; a login
/// result only takes effect once handed to
/// [`complete_login`](Self::complete_login).
#[derive(Debug)]
pub struct SessionClient {
    api: ApiClient,
    token: Option<AccessToken>,
}

impl SessionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api, token: None }
    }

    /// Builds a login request for `username` and `password`.
    pub fn login(&self, username: &str, password: &str) -> SessionFuture<AccessToken, AuthError> {
        let api = self.api.clone();
        let (username, password) = (username.to_owned(), password.to_owned());
        Box::pin(async move { api.login(&username, &password).await })
    }

    /// Records the outcome of a login request.
    ///
    /// A success replaces any held token. A failure leaves the session as it was.
    pub fn complete_login(
        &mut self,
        result: Result<AccessToken, AuthError>,
    ) -> Result<AccessToken, AuthError> {
        if let Ok(token) = &result {
            info!("session established");
            self.token = Some(token.clone());
        }
        result
    }

    /// Builds a profile request bound to the token held right now.
    ///
    /// Without a session the request resolves to [`FetchError::NoSession`]
    /// without touching the network.
    pub fn fetch_profile(&self) -> SessionFuture<UserProfile, FetchError> {
        let api = self.api.clone();
        let token = self.token.clone();
        Box::pin(async move {
            let token = token.ok_or(FetchError::NoSession)?;
            api.fetch_profile(&token).await
        })
    }

    /// Drops the token. The server is not contacted.
    pub fn logout(&mut self) {
        if self.token.take().is_some() {
            info!("session ended");
        }
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
