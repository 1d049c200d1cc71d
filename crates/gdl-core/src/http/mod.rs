//! Blocking HTTP helpers on top of libcurl.
//!
//! Small request/response wrappers used by the token exchange and the Drive
//! listing, plus a streaming download that writes straight to disk.

mod download;
mod error;

pub use download::download_to_file;
pub use error::DownloadError;

use std::time::Duration;

const USER_AGENT: &str = concat!("gdl/", env!("CARGO_PKG_VERSION"));

/// Timeouts applied to every curl handle.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Fully buffered response (status + body).
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u32,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text for error messages; invalid UTF-8 is replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

/// `Authorization` header line for a bearer token.
pub fn bearer_header(token: &str) -> String {
    format!("Authorization: Bearer {}", token)
}

fn new_easy(url: &str, opts: HttpOptions) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.useragent(USER_AGENT)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    Ok(easy)
}

fn header_list(headers: &[String]) -> Result<curl::easy::List, curl::Error> {
    let mut list = curl::easy::List::new();
    for h in headers {
        list.append(h)?;
    }
    Ok(list)
}

fn perform_buffered(easy: &mut curl::easy::Easy) -> Result<Response, curl::Error> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let status = easy.response_code()?;
    Ok(Response { status, body })
}

/// GET `url` with extra header lines (e.g. `"Authorization: Bearer ..."`).
pub fn get(url: &str, headers: &[String], opts: HttpOptions) -> Result<Response, curl::Error> {
    let mut easy = new_easy(url, opts)?;
    if !headers.is_empty() {
        easy.http_headers(header_list(headers)?)?;
    }
    perform_buffered(&mut easy)
}

/// POST an `application/x-www-form-urlencoded` body built from `fields`.
pub fn post_form(
    url: &str,
    fields: &[(&str, &str)],
    opts: HttpOptions,
) -> Result<Response, curl::Error> {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter())
        .finish();

    let mut easy = new_easy(url, opts)?;
    easy.post(true)?;
    easy.post_fields_copy(body.as_bytes())?;
    // An empty Expect suppresses `100-continue` round trips on larger assertions.
    easy.http_headers(header_list(&[
        "Content-Type: application/x-www-form-urlencoded".to_string(),
        "Expect:".to_string(),
    ])?)?;
    perform_buffered(&mut easy)
}
