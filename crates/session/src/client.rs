//! HTTP transport for the DAHOUSE API.
//!
//! Async client using `reqwest`. Every call is issued once; there is no
//! retry.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, warn};

use crate::types::{AccessToken, LoginRequest, LoginResponse, UserProfile};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a login attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("server unreachable")]
    ServerUnreachable,

    #[error("unexpected login response")]
    Unknown,
}

/// Errors from fetching the user profile.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("server unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("API error {0}")]
    Status(u16),

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no active session")]
    NoSession,
}

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without the endpoint path, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Upper bound for a single request.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Cloneable transport for `/login` and `/user`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Exchanges a username and password for an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let resp = match self.http.post(self.url("/login")).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("login request failed: {e}");
                return Err(AuthError::ServerUnreachable);
            }
        };

        let status = resp.status();
        debug!(status = status.as_u16(), "login response");

        match status {
            StatusCode::OK => {
                let bytes = resp.bytes().await.map_err(|e| {
                    warn!("failed to read login response: {e}");
                    AuthError::ServerUnreachable
                })?;
                let parsed: LoginResponse = serde_json::from_slice(&bytes).map_err(|e| {
                    warn!("malformed login response: {e}");
                    AuthError::Unknown
                })?;
                Ok(parsed.access_token)
            }
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            StatusCode::NOT_FOUND => Err(AuthError::UserNotFound),
            _ => Err(AuthError::Unknown),
        }
    }

    /// Fetches the profile of the user owning `token`.
    pub async fn fetch_profile(&self, token: &AccessToken) -> Result<UserProfile, FetchError> {
        let resp = self
            .http
            .get(self.url("/user"))
            .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Reads one HTTP/1.1 request (headers plus `Content-Length` body).
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Starts a one-shot mock HTTP server replying with `status` and `body`.
    ///
    /// The raw request is delivered on the returned receiver.
    pub(crate) async fn mock_server(
        status: u16,
        body: &str,
    ) -> (String, oneshot::Receiver<String>, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();
        let (req_tx, req_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let request = read_request(&mut stream).await;
                let _ = req_tx.send(request);

                let resp = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, req_rx, handle)
    }

    /// Returns a base URL on which nothing is listening.
    pub(crate) async fn dead_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    pub(crate) fn client_for(url: String) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn login_success_returns_token() {
        let (url, req_rx, handle) = mock_server(200, r#"{"access_token":"abc"}"#).await;

        let token = client_for(url).login("alice", "pw1").await.unwrap();
        assert_eq!(token.as_str(), "abc");

        let request = req_rx.await.unwrap();
        assert!(request.starts_with("POST /login "));
        let body = request.split("\r\n\r\n").nth(1).unwrap();
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"nombre_usuario": "alice", "password": "pw1"})
        );

        handle.abort();
    }

    #[tokio::test]
    async fn login_401_is_invalid_credentials() {
        let (url, _req, handle) = mock_server(401, r#"{"msg":"bad"}"#).await;
        let err = client_for(url).login("alice", "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        handle.abort();
    }

    #[tokio::test]
    async fn login_404_is_user_not_found() {
        let (url, _req, handle) = mock_server(404, "{}").await;
        let err = client_for(url).login("nobody", "pw").await.unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
        handle.abort();
    }

    #[tokio::test]
    async fn login_other_status_is_unknown() {
        let (url, _req, handle) = mock_server(500, "{}").await;
        let err = client_for(url).login("alice", "pw1").await.unwrap_err();
        assert_eq!(err, AuthError::Unknown);
        handle.abort();
    }

    #[tokio::test]
    async fn login_200_without_token_is_unknown() {
        let (url, _req, handle) = mock_server(200, r#"{"message":"ok"}"#).await;
        let err = client_for(url).login("alice", "pw1").await.unwrap_err();
        assert_eq!(err, AuthError::Unknown);
        handle.abort();
    }

    #[tokio::test]
    async fn login_without_server_is_unreachable() {
        let url = dead_server().await;
        let err = client_for(url).login("alice", "pw1").await.unwrap_err();
        assert_eq!(err, AuthError::ServerUnreachable);
    }

    #[tokio::test]
    async fn fetch_profile_sends_bearer_token() {
        let (url, req_rx, handle) =
            mock_server(200, r#"{"id":7,"correo_electronico":"a@x.com"}"#).await;

        let profile = client_for(url)
            .fetch_profile(&AccessToken::new("abc"))
            .await
            .unwrap();
        assert_eq!(profile.id, Some(crate::FieldValue::Integer(7)));
        assert!(profile.role.is_none());

        let request = req_rx.await.unwrap();
        assert!(request.starts_with("GET /user "));
        assert!(
            request
                .lines()
                .any(|l| l.eq_ignore_ascii_case("authorization: Bearer abc"))
        );

        handle.abort();
    }

    #[tokio::test]
    async fn fetch_profile_non_200_is_status_error() {
        let (url, _req, handle) = mock_server(401, r#"{"msg":"expired"}"#).await;
        let err = client_for(url)
            .fetch_profile(&AccessToken::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(401)));
        handle.abort();
    }

    #[tokio::test]
    async fn fetch_profile_bad_body_is_decode_error() {
        let (url, _req, handle) = mock_server(200, "not json").await;
        let err = client_for(url)
            .fetch_profile(&AccessToken::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        handle.abort();
    }

    #[tokio::test]
    async fn fetch_profile_without_server_is_unreachable() {
        let url = dead_server().await;
        let err = client_for(url)
            .fetch_profile(&AccessToken::new("abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Unreachable(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = client_for("http://127.0.0.1:5000/".into());
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(client.url("/login"), "http://127.0.0.1:5000/login");
    }

    #[test]
    fn default_config_points_at_local_server() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
