//! Download error type.

use thiserror::Error;

/// Error returned by a single content download (curl failure, HTTP error, or storage failure).
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status; `body` is the (truncated) error payload.
    #[error("HTTP {status}{}", body_suffix(.body))]
    Http { status: u32, body: String },
    /// Disk write, rename or create failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}
