//! The download run: authenticate, list, select, prepare destination, download.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth;
use crate::config::GdlConfig;
use crate::drive::{DriveClient, RemoteEntry};
use crate::local_name::local_file_name;
use crate::select::select_entries;

/// Inputs of one run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub service_account_key: PathBuf,
    pub directory_id: String,
    /// Exact title to download; all files when `None`.
    pub file_name: Option<String>,
    /// Directory to download into; the current directory when `None`.
    pub destination: Option<PathBuf>,
    pub fail_if_nothing_was_downloaded: bool,
}

/// Raised when a run downloaded nothing and the caller asked for that to fail.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Nothing was downloaded")]
pub struct NothingDownloaded;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// Absolute directory files were written to.
    pub destination: PathBuf,
    /// Local paths written, in download order.
    pub downloaded: Vec<PathBuf>,
}

impl FetchReport {
    pub fn count(&self) -> usize {
        self.downloaded.len()
    }

    /// Fails with `NothingDownloaded` only when `fail_if_nothing_was_downloaded`
    /// is set and the count is zero.
    pub fn enforce(&self, fail_if_nothing_was_downloaded: bool) -> Result<(), NothingDownloaded> {
        if fail_if_nothing_was_downloaded && self.downloaded.is_empty() {
            return Err(NothingDownloaded);
        }
        Ok(())
    }
}

/// Resolves the download directory, creating it (and parents) when missing.
pub fn prepare_destination(destination: Option<&Path>) -> Result<PathBuf> {
    let dir = match destination {
        None => return std::env::current_dir().context("cannot determine current directory"),
        Some(dir) => dir,
    };
    if !dir.is_dir() {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create destination {}", dir.display()))?;
        tracing::info!("created destination {}", dir.display());
    }
    fs::canonicalize(dir).with_context(|| format!("cannot resolve destination {}", dir.display()))
}

/// Downloads `entries` into `dir` in order, calling `on_download` with the
/// target path before each transfer. Stops at the first failure.
pub fn download_entries<F>(
    client: &DriveClient,
    entries: &[&RemoteEntry],
    dir: &Path,
    mut on_download: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path),
{
    let mut written = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = dir.join(local_file_name(&entry.title, &entry.id));
        on_download(&path);
        let bytes = client.download(entry, &path)?;
        tracing::info!(id = %entry.id, bytes, path = %path.display(), "downloaded");
        written.push(path);
    }
    Ok(written)
}

/// Runs the whole pipeline for `req`. The destination is only touched after
/// the listing succeeded.
pub fn run<F>(req: &FetchRequest, cfg: &GdlConfig, on_download: F) -> Result<FetchReport>
where
    F: FnMut(&Path),
{
    let token = auth::authenticate(&req.service_account_key, cfg)
        .context("service account authentication failed")?;

    let client = DriveClient::new(cfg.api_base(), token, cfg.http_options())
        .with_page_size(cfg.page_size);
    let entries = client
        .list_children(&req.directory_id)
        .with_context(|| format!("cannot list folder {}", req.directory_id))?;

    let selected = select_entries(&entries, req.file_name.as_deref());
    tracing::info!(
        listed = entries.len(),
        selected = selected.len(),
        file = ?req.file_name,
        "selected entries"
    );

    let destination = prepare_destination(req.destination.as_deref())?;
    let downloaded = download_entries(&client, &selected, &destination, on_download)?;

    Ok(FetchReport {
        destination,
        downloaded,
    })
}
