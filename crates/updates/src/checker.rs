//! Release endpoint client.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, info};

use crate::types::{LatestRelease, ReleaseInfo, UpdateStatus};
use crate::version::{VersionOrdering, is_newer};

const DEFAULT_RELEASE_URL: &str = "https://api.github.com/repos/zaindou/dahouse-gui/releases/latest";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the update check. None of them are fatal to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("release endpoint unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("release endpoint returned {0}")]
    Status(u16),

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid user agent")]
    InvalidUserAgent,
}

/// Settings for [`UpdateChecker`].
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Latest-release metadata endpoint.
    pub release_url: String,
    /// Version of the running build.
    pub current_version: String,
    pub ordering: VersionOrdering,
    /// Sent as `User-Agent`; GitHub rejects requests without one.
    pub user_agent: String,
    pub timeout: Duration,
}

impl UpdateConfig {
    pub fn new(current_version: impl Into<String>) -> Self {
        let current_version = current_version.into();
        Self {
            release_url: DEFAULT_RELEASE_URL.into(),
            user_agent: format!("dahouse-desktop/{current_version}"),
            current_version,
            ordering: VersionOrdering::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Compares the latest published release with the running version.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    http: reqwest::Client,
    release_url: String,
    current_version: String,
    ordering: VersionOrdering,
}

impl UpdateChecker {
    pub fn new(config: UpdateConfig) -> Result<Self, CheckError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|_| CheckError::InvalidUserAgent)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            release_url: config.release_url,
            current_version: config.current_version,
            ordering: config.ordering,
        })
    }

    /// Fetches the latest release metadata.
    pub async fn fetch_latest_release(&self) -> Result<ReleaseInfo, CheckError> {
        let resp = self.http.get(&self.release_url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(CheckError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        let release: LatestRelease = serde_json::from_slice(&bytes)?;
        debug!(version = %release.tag_name, "latest release");
        Ok(release.into())
    }

    /// Fetches the latest release and compares it with the running version.
    pub async fn check(&self) -> Result<UpdateStatus, CheckError> {
        let release = self.fetch_latest_release().await?;
        if is_newer(&release.version, &self.current_version, self.ordering) {
            info!(
                current = %self.current_version,
                latest = %release.version,
                "update available"
            );
            Ok(UpdateStatus::Available(release))
        } else {
            Ok(UpdateStatus::UpToDate {
                current: self.current_version.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a mock HTTP server that responds once with `status` and `body`.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/releases/latest");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let mut request = String::new();
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                if let Ok(n) = stream.read(&mut buf).await {
                    request = String::from_utf8_lossy(&buf[..n]).into_owned();
                }

                let resp = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
            request
        });

        (url, handle)
    }

    fn checker(url: String, current: &str, ordering: VersionOrdering) -> UpdateChecker {
        UpdateChecker::new(UpdateConfig {
            release_url: url,
            ordering,
            timeout: Duration::from_secs(5),
            ..UpdateConfig::new(current)
        })
        .unwrap()
    }

    #[tokio::test]
    async fn newer_release_is_available() {
        let (url, handle) =
            mock_server(200, r#"{"tag_name":"0.0.2","html_url":"https://x/0.0.2"}"#).await;

        let status = checker(url, "0.0.1", VersionOrdering::Semantic)
            .check()
            .await
            .unwrap();
        assert_eq!(
            status,
            UpdateStatus::Available(ReleaseInfo {
                version: "0.0.2".into(),
                download_url: "https://x/0.0.2".into(),
            })
        );

        let request = handle.await.unwrap();
        assert!(request.starts_with("GET /releases/latest "));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("user-agent: dahouse-desktop/0.0.1")
        );
    }

    #[tokio::test]
    async fn same_release_is_up_to_date() {
        let (url, _handle) =
            mock_server(200, r#"{"tag_name":"0.0.1","html_url":"https://x/0.0.1"}"#).await;

        let status = checker(url, "0.0.1", VersionOrdering::Semantic)
            .check()
            .await
            .unwrap();
        assert_eq!(
            status,
            UpdateStatus::UpToDate {
                current: "0.0.1".into()
            }
        );
        assert!(!status.is_available());
    }

    #[tokio::test]
    async fn lexical_ordering_misses_multi_digit_release() {
        let (url, _handle) =
            mock_server(200, r#"{"tag_name":"0.0.10","html_url":"https://x"}"#).await;

        let status = checker(url, "0.0.9", VersionOrdering::Lexical)
            .check()
            .await
            .unwrap();
        assert!(!status.is_available());
    }

    #[tokio::test]
    async fn extra_fields_are_ignored() {
        let (url, _handle) = mock_server(
            200,
            r#"{"tag_name":"1.0.0","html_url":"https://x","draft":false,"assets":[]}"#,
        )
        .await;

        let release = checker(url, "0.0.1", VersionOrdering::Semantic)
            .fetch_latest_release()
            .await
            .unwrap();
        assert_eq!(release.version, "1.0.0");
    }

    #[tokio::test]
    async fn non_200_is_status_error() {
        let (url, _handle) = mock_server(403, r#"{"message":"rate limited"}"#).await;

        let err = checker(url, "0.0.1", VersionOrdering::Semantic)
            .check()
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Status(403)));
    }

    #[tokio::test]
    async fn missing_tag_is_decode_error() {
        let (url, _handle) = mock_server(200, r#"{"html_url":"https://x"}"#).await;

        let err = checker(url, "0.0.1", VersionOrdering::Semantic)
            .check()
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = checker(
            format!("http://127.0.0.1:{port}/latest"),
            "0.0.1",
            VersionOrdering::Semantic,
        )
        .check()
        .await
        .unwrap_err();
        assert!(matches!(err, CheckError::Unreachable(_)));
    }

    #[test]
    fn default_config() {
        let config = UpdateConfig::new("0.0.1");
        assert!(config.release_url.contains("releases/latest"));
        assert_eq!(config.user_agent, "dahouse-desktop/0.0.1");
        assert_eq!(config.ordering, VersionOrdering::Semantic);
    }

    #[test]
    fn invalid_user_agent_is_rejected() {
        let config = UpdateConfig {
            user_agent: "bad\nagent".into(),
            ..UpdateConfig::new("0.0.1")
        };
        assert!(matches!(
            UpdateChecker::new(config),
            Err(CheckError::InvalidUserAgent)
        ));
    }
}
