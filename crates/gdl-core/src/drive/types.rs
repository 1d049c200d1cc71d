//! Drive v2 resources as returned by `files.list`.

use serde::Deserialize;

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Prefix shared by Google-native types (Docs, Sheets, folders, ...).
pub const GOOGLE_APPS_MIME_PREFIX: &str = "application/vnd.google-apps.";

/// One file or folder in a Drive listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub id: String,
    /// Display name.
    pub title: String,
    pub mime_type: String,
    /// Direct content URL; absent for Google-native documents.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Size in bytes (Drive sends it as a string).
    #[serde(default)]
    pub file_size: Option<String>,
}

impl RemoteEntry {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    /// Docs/Sheets/Slides etc. have no binary content of their own.
    pub fn is_google_native(&self) -> bool {
        self.mime_type.starts_with(GOOGLE_APPS_MIME_PREFIX)
    }

    pub fn size(&self) -> Option<u64> {
        self.file_size.as_deref().and_then(|s| s.parse().ok())
    }
}

/// One page of `files.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListPage {
    #[serde(default)]
    pub items: Vec<RemoteEntry>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Drive error envelope: `{"error": {"code": 404, "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}
