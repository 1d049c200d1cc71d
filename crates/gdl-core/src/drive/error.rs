use crate::http::DownloadError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while listing a folder or fetching file content.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("invalid Drive API URL")]
    Url(#[from] url::ParseError),

    #[error("Drive request failed")]
    Transport(#[from] curl::Error),

    #[error("Drive API returned HTTP {status}: {message}")]
    Api { status: u32, message: String },

    #[error("invalid Drive API response")]
    Decode(#[source] serde_json::Error),

    #[error("'{title}' ({mime_type}) has no downloadable content")]
    NotDownloadable { title: String, mime_type: String },

    #[error("download of '{title}' to {} failed", .path.display())]
    Download {
        title: String,
        path: PathBuf,
        #[source]
        source: DownloadError,
    },
}
