use std::time::Duration;

use bytes::Bytes;

pub const DEFAULT_USER_AGENT: &str = "UbuntuImageFetcher/1.0";
pub const ACCEPT_IMAGES: &str = "image/*";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A successful (2xx) response with its body fully read.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// Declared `Content-Type`, if the server sent one.
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedResponse {
    /// Whether the declared content type mentions `image` anywhere.
    ///
    /// A missing header counts as "not an image".
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("image"))
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub accept: String,
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: ACCEPT_IMAGES.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
