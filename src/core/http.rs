use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use tracing::{debug, error};

use crate::core::error::{AdminError, AdminResult};

const APP_USER_AGENT: &str = "MCAdmin/0.1.0";

pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}

/// Status and full body of a single GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Only a plain 200 counts; 204/206 bodies are empty or partial.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// One blocking-until-complete GET. Implemented over reqwest in production
/// and replaced by an in-memory double in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> AdminResult<HttpResponse>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> AdminResult<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> AdminResult<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// GET `url` and return the body, failing with `FetchFailed` on a
/// status other than 200.
pub async fn fetch_bytes(transport: &dyn Transport, url: &str) -> AdminResult<Vec<u8>> {
    debug!("Retrieving [{}]...", url);
    let response = transport.get(url).await?;

    if !response.is_success() {
        error!("Failed to retrieve url [{}]: http status {}", url, response.status);
        return Err(AdminError::FetchFailed {
            url: url.to_string(),
            status: response.status,
        });
    }

    Ok(response.body)
}


#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let transport = MockTransport::new().route("https://example.com/a", 200, "hello");
        let body = fetch_bytes(&transport, "https://example.com/a").await.unwrap();
        assert_eq!(body, b"hello");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn fetch_reports_status_on_failure() {
        let transport = MockTransport::new().route("https://example.com/a", 503, "");
        let err = fetch_bytes(&transport, "https://example.com/a")
            .await
            .unwrap_err();
        match err {
            AdminError::FetchFailed { url, status } => {
                assert_eq!(url, "https://example.com/a");
                assert_eq!(status, 503);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn no_content_is_not_success() {
        let transport = MockTransport::new().route("https://example.com/a", 204, "");
        let err = fetch_bytes(&transport, "https://example.com/a")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::FetchFailed { status: 204, .. }));
    }

    #[tokio::test]
    async fn transport_error_surfaces_as_http() {
        let transport = HttpTransport::new().unwrap();
        let err = fetch_bytes(&transport, "not a url").await.unwrap_err();
        assert!(matches!(err, AdminError::Http(_)));
    }
}
