use reqwest::StatusCode;
use thiserror::Error;

/// Why a single URL did not end up on disk.
///
/// `Display` renders the text of the status line shown to the user. Error
/// statuses share the connection-error wording.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Connection error for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Connection error for {url}: {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Skipped: {url} (Not an image)")]
    NotAnImage { url: String },

    #[error("Skipped duplicate: {filename}")]
    Duplicate { filename: String },

    #[error("An error occurred for {url}: {message}")]
    Unexpected { url: String, message: String },
}
