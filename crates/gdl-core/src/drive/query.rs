//! Request URLs for the Drive v2 endpoints used here.

use url::Url;

/// Drive search expression selecting the non-trashed children of `folder_id`.
pub fn children_query(folder_id: &str) -> String {
    format!("'{}' in parents and trashed=false", escape_literal(folder_id))
}

/// Escapes `\` and `'` inside a single-quoted Drive query literal.
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// `files.list` URL for one page of children.
pub fn list_url(
    api_base: &str,
    folder_id: &str,
    page_size: Option<u32>,
    page_token: Option<&str>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/files", api_base))?;
    {
        let mut q = url.query_pairs_mut();
        q.append_pair("q", &children_query(folder_id));
        q.append_pair("supportsAllDrives", "true");
        q.append_pair("includeItemsFromAllDrives", "true");
        if let Some(n) = page_size {
            q.append_pair("maxResults", &n.to_string());
        }
        if let Some(token) = page_token {
            q.append_pair("pageToken", token);
        }
    }
    Ok(url)
}

/// `files.get?alt=media` URL, used when an entry carries no `downloadUrl`.
pub fn media_url(api_base: &str, file_id: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/files", api_base))?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .push(file_id);
    url.query_pairs_mut()
        .append_pair("alt", "media")
        .append_pair("supportsAllDrives", "true");
    Ok(url)
}
