//! Single-stream GET into a local file.
//!
//! The body is written to a hidden, uniquely named temp file next to `dest`
//! and renamed onto `dest` once the transfer succeeded, so a failed download
//! never leaves a truncated file under the final name and never touches other
//! files in the directory.

use super::error::DownloadError;
use super::{header_list, new_easy, HttpOptions};
use std::cell::Cell;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix of in-flight temp files; the random middle part makes each name unique.
const TEMP_PREFIX: &str = ".gdl-";

/// Suffix of in-flight temp files.
const TEMP_SUFFIX: &str = ".part";

/// Max bytes of an error response kept for the error message.
const ERROR_BODY_LIMIT: usize = 4096;

/// Parses the status code out of an `HTTP/1.1 200 OK` style header line.
fn status_from_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Downloads `url` into `dest`, replacing any existing file.
/// Returns the number of bytes written.
pub fn download_to_file(
    url: &str,
    headers: &[String],
    dest: &Path,
    opts: HttpOptions,
) -> Result<u64, DownloadError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    // Created with O_EXCL; dropping it on any error path removes it.
    let mut part = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)?;

    let written = transfer_into(url, headers, part.as_file_mut(), opts)?;
    part.persist(dest)
        .map_err(|e| DownloadError::Storage(e.error))?;
    Ok(written)
}

fn transfer_into(
    url: &str,
    headers: &[String],
    file: &mut File,
    opts: HttpOptions,
) -> Result<u64, DownloadError> {
    let mut easy = new_easy(url, opts)?;
    if !headers.is_empty() {
        easy.http_headers(header_list(headers)?)?;
    }

    // Status of the latest response seen; redirects produce several.
    let status = Cell::new(0u32);
    let mut written: u64 = 0;
    let mut error_body: Vec<u8> = Vec::new();
    let mut write_err: Option<std::io::Error> = None;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            if let Some(code) = status_from_line(line) {
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            if !(200..300).contains(&status.get()) {
                let room = ERROR_BODY_LIMIT.saturating_sub(error_body.len());
                error_body.extend_from_slice(&data[..data.len().min(room)]);
                return Ok(data.len());
            }
            match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(DownloadError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::Http {
            status: code,
            body: String::from_utf8_lossy(&error_body).trim().to_string(),
        });
    }

    file.flush()?;
    file.sync_all()?;
    Ok(written)
}
