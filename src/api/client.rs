use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use super::models::{FetchedResponse, FetcherConfig};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Malformed header: {0}")]
    MalformedHeader(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Thin wrapper around a single reqwest client shared by the whole run.
pub struct ImageClient {
    client: Client,
}

impl ImageClient {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT, header_value(&config.accept)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }

    /// Issue a single GET and read the whole body.
    ///
    /// 4xx and 5xx answers come back as [`ClientError::Status`]; transport
    /// failures (including while reading the body) as
    /// [`ClientError::RequestError`]. No retries.
    pub async fn fetch(&self, url: Url) -> Result<FetchedResponse> {
        tracing::debug!(%url, "sending GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ClientError::Status(status));
        }

        let content_type = declared_content_type(response.headers());
        let body = response.bytes().await?;
        tracing::debug!(
            %status,
            content_type = content_type.as_deref().unwrap_or(""),
            len = body.len(),
            "response received"
        );

        Ok(FetchedResponse { content_type, body })
    }
}

/// Non-ASCII bytes are decoded lossily so the `image` check still runs.
fn declared_content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::MalformedHeader(format!("{:?}: {}", value, e)))
}
