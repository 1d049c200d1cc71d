//! Drive v2 client: folder listing and content download.

mod error;
mod query;
mod types;

pub use error::DriveError;
pub use query::{children_query, list_url, media_url};
pub use types::{FileListPage, RemoteEntry, FOLDER_MIME_TYPE, GOOGLE_APPS_MIME_PREFIX};

use crate::auth::AccessToken;
use crate::http::{self, HttpOptions, Response};
use std::path::Path;
use types::ApiErrorBody;

/// Authorized handle on the Drive API.
#[derive(Debug, Clone)]
pub struct DriveClient {
    api_base: String,
    token: AccessToken,
    http: HttpOptions,
    page_size: Option<u32>,
}

impl DriveClient {
    pub fn new(api_base: &str, token: AccessToken, http: HttpOptions) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            http,
            page_size: None,
        }
    }

    /// Request at most `n` entries per listing page.
    pub fn with_page_size(mut self, n: Option<u32>) -> Self {
        self.page_size = n;
        self
    }

    fn auth_headers(&self) -> Vec<String> {
        vec![self.token.authorization_header()]
    }

    /// Lists the non-trashed children of `folder_id`, following every page.
    pub fn list_children(&self, folder_id: &str) -> Result<Vec<RemoteEntry>, DriveError> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let url = list_url(
                &self.api_base,
                folder_id,
                self.page_size,
                page_token.as_deref(),
            )?;
            let response = http::get(url.as_str(), &self.auth_headers(), self.http)?;
            check_status(&response)?;
            let page: FileListPage =
                serde_json::from_slice(&response.body).map_err(DriveError::Decode)?;
            pages += 1;
            tracing::debug!(
                folder_id,
                page = pages,
                items = page.items.len(),
                "listed page"
            );
            entries.extend(page.items);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::info!(folder_id, entries = entries.len(), pages, "listed folder");
        Ok(entries)
    }

    /// Downloads the content of `entry` into `dest`. Returns bytes written.
    pub fn download(&self, entry: &RemoteEntry, dest: &Path) -> Result<u64, DriveError> {
        let url = match &entry.download_url {
            Some(u) if !u.is_empty() => u.clone(),
            _ if entry.is_google_native() => {
                return Err(DriveError::NotDownloadable {
                    title: entry.title.clone(),
                    mime_type: entry.mime_type.clone(),
                });
            }
            _ => media_url(&self.api_base, &entry.id)?.to_string(),
        };

        tracing::debug!(id = %entry.id, %url, dest = %dest.display(), "downloading");
        let written = http::download_to_file(&url, &self.auth_headers(), dest, self.http)
            .map_err(|source| DriveError::Download {
                title: entry.title.clone(),
                path: dest.to_path_buf(),
                source,
            })?;

        if let Some(expected) = entry.size() {
            if expected != written {
                tracing::warn!(
                    id = %entry.id,
                    expected,
                    written,
                    "downloaded size differs from listed fileSize"
                );
            }
        }
        Ok(written)
    }
}

/// Maps a non-2xx response to `DriveError::Api`, preferring the API's own message.
fn check_status(response: &Response) -> Result<(), DriveError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_slice::<ApiErrorBody>(&response.body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| response.body_text());
    Err(DriveError::Api {
        status: response.status,
        message,
    })
}
