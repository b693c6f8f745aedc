use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;
use warrant_application::GroupSource;
use warrant_core::{AppError, AppResult};

/// Group source backed by a remote directory's users/groups API.
///
/// Requests `GET {org_url}/api/v1/users/{id}/groups` with an `SSWS` token. An
/// unknown user (404) has no groups; every other failure is `LookupFailed`.
#[derive(Debug, Clone)]
pub struct DirectoryGroupSource {
    http_client: reqwest::Client,
    org_url: Url,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryGroup {
    profile: DirectoryGroupProfile,
}

#[derive(Debug, Deserialize)]
struct DirectoryGroupProfile {
    name: String,
}

impl DirectoryGroupSource {
    /// Creates a source with a client whose requests give up after `timeout`.
    pub fn new(org_url: Url, api_token: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build directory http client: {error}"))
            })?;

        Ok(Self {
            http_client,
            org_url,
            api_token: api_token.into(),
        })
    }

    fn groups_url(&self, user_id: &str) -> AppResult<Url> {
        let mut url = self.org_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "directory url '{}' cannot carry a path",
                    self.org_url
                ))
            })?
            .pop_if_empty()
            .extend(["api", "v1", "users", user_id, "groups"]);

        Ok(url)
    }
}

/// Extracts group names from a directory groups response body.
fn parse_group_names(body: &[u8]) -> AppResult<Vec<String>> {
    let groups = serde_json::from_slice::<Vec<DirectoryGroup>>(body).map_err(|error| {
        AppError::LookupFailed(format!("failed to decode directory response: {error}"))
    })?;

    Ok(groups.into_iter().map(|group| group.profile.name).collect())
}

#[async_trait]
impl GroupSource for DirectoryGroupSource {
    async fn groups_for_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        let url = self.groups_url(user_id)?;

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(
                reqwest::header::AUTHORIZATION,
                format!("SSWS {}", self.api_token),
            )
            .send()
            .await
            .map_err(|error| {
                warn!(user = user_id, error = %error, "directory request failed");
                AppError::LookupFailed(format!("directory request failed: {error}"))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(user = user_id, "directory does not know user");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            warn!(user = user_id, status = %status, "directory rejected group lookup");
            return Err(AppError::LookupFailed(format!(
                "directory returned status {status}"
            )));
        }

        let body = response.bytes().await.map_err(|error| {
            AppError::LookupFailed(format!("failed to read directory response: {error}"))
        })?;

        parse_group_names(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use url::Url;
    use warrant_application::GroupSource;
    use warrant_core::AppError;

    use super::{DirectoryGroupSource, parse_group_names};

    fn source(org_url: &str) -> DirectoryGroupSource {
        let org_url = Url::parse(org_url).unwrap_or_else(|_| unreachable!());
        DirectoryGroupSource::new(org_url, "token", Duration::from_millis(500))
            .unwrap_or_else(|_| unreachable!())
    }

    /// Answers one request with a canned response and hands back the request head.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|_| unreachable!());
        let address = listener.local_addr().unwrap_or_else(|_| unreachable!());
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };

            let mut request = Vec::new();
            let mut buffer = [0_u8; 1024];
            while let Ok(read) = stream.read(&mut buffer).await {
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
                if request.windows(4).any(|window| window == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
            let _ = request_tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (format!("http://{address}"), request_rx)
    }

    #[test]
    fn parses_profile_names() {
        let body = br#"[
            { "id": "00g1", "profile": { "name": "engineering", "description": "" } },
            { "id": "00g2", "profile": { "name": "oncall" } }
        ]"#;

        let names = parse_group_names(body).unwrap_or_default();
        assert_eq!(names, vec!["engineering".to_owned(), "oncall".to_owned()]);
    }

    #[test]
    fn undecodable_body_is_lookup_failure() {
        let result = parse_group_names(b"<html>maintenance</html>");
        assert!(matches!(result, Err(AppError::LookupFailed(_))));
    }

    #[test]
    fn builds_escaped_groups_url() {
        let url = source("https://example.okta.com/")
            .groups_url("jane@example.com")
            .map(|url| url.to_string())
            .unwrap_or_default();
        assert_eq!(
            url,
            "https://example.okta.com/api/v1/users/jane@example.com/groups"
        );

        let url = source("https://example.okta.com")
            .groups_url("a/b")
            .map(|url| url.to_string())
            .unwrap_or_default();
        assert_eq!(url, "https://example.okta.com/api/v1/users/a%2Fb/groups");
    }

    #[tokio::test]
    async fn unreachable_directory_is_lookup_failure() {
        let result = source("http://127.0.0.1:1").groups_for_user("u1").await;
        assert!(matches!(result, Err(AppError::LookupFailed(_))));
    }

    #[tokio::test]
    async fn unknown_user_has_no_groups() {
        let (org_url, request) = serve_once("404 Not Found", r#"{"errorCode":"E0000007"}"#).await;

        let groups = source(&org_url).groups_for_user("ghost").await;
        assert!(groups.is_ok_and(|groups| groups.is_empty()));

        let request = request.await.unwrap_or_default().to_ascii_lowercase();
        assert!(request.starts_with("get /api/v1/users/ghost/groups "));
        assert!(request.contains("authorization: ssws token"));
    }

    #[tokio::test]
    async fn directory_server_error_is_lookup_failure() {
        let (org_url, _request) = serve_once("500 Internal Server Error", "{}").await;

        let result = source(&org_url).groups_for_user("u1").await;
        assert!(matches!(
            result,
            Err(AppError::LookupFailed(message)) if message.contains("500")
        ));
    }

    #[tokio::test]
    async fn successful_lookup_returns_group_names() {
        let (org_url, _request) = serve_once(
            "200 OK",
            r#"[{ "id": "00g1", "profile": { "name": "eng" } }]"#,
        )
        .await;

        let groups = source(&org_url).groups_for_user("u1").await;
        assert!(groups.is_ok_and(|groups| groups == vec!["eng".to_owned()]));
    }
}
