//! Minimal HTTP/1.1 server emulating the Google token endpoint and the Drive v2
//! `files.list` / content endpoints for integration tests.
//!
//! Serves one folder (`FOLDER_ID`). Listing honors `pageToken` and splits the
//! folder into pages of `page_size` items. Every Drive request must carry the
//! token handed out by `POST /token`.

use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const FOLDER_ID: &str = "folder-123";
pub const ACCESS_TOKEN: &str = "test-access-token";

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const DOC_MIME: &str = "application/vnd.google-apps.document";

/// One child of the served folder.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub id: String,
    pub title: String,
    pub mime_type: String,
    pub content: Option<Vec<u8>>,
    /// Advertise `downloadUrl` in the listing (else clients must use `alt=media`).
    pub with_download_url: bool,
}

impl RemoteFile {
    pub fn file(id: &str, title: &str, content: &[u8]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            mime_type: "application/octet-stream".to_string(),
            content: Some(content.to_vec()),
            with_download_url: true,
        }
    }

    pub fn media_only(id: &str, title: &str, content: &[u8]) -> Self {
        Self {
            with_download_url: false,
            ..Self::file(id, title, content)
        }
    }

    pub fn folder(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            mime_type: FOLDER_MIME.to_string(),
            content: None,
            with_download_url: false,
        }
    }

    pub fn google_doc(id: &str, title: &str) -> Self {
        Self {
            mime_type: DOC_MIME.to_string(),
            ..Self::folder(id, title)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DriveServerOptions {
    /// Items per listing page.
    pub page_size: usize,
    /// If true, `POST /token` answers 400 `invalid_grant`.
    pub reject_token: bool,
}

impl Default for DriveServerOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            reject_token: false,
        }
    }
}

struct State {
    base: String,
    files: Vec<RemoteFile>,
    opts: DriveServerOptions,
    token_requests: AtomicUsize,
    list_requests: AtomicUsize,
    content_requests: AtomicUsize,
}

/// Handle on a running server. The server runs until the process exits.
pub struct DriveServer {
    state: Arc<State>,
}

impl DriveServer {
    /// Base URL, e.g. `http://127.0.0.1:12345/`.
    pub fn base(&self) -> &str {
        &self.state.base
    }

    pub fn token_uri(&self) -> String {
        format!("{}token", self.state.base)
    }

    pub fn api_base(&self) -> String {
        format!("{}drive/v2", self.state.base)
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn list_requests(&self) -> usize {
        self.state.list_requests.load(Ordering::SeqCst)
    }

    pub fn content_requests(&self) -> usize {
        self.state.content_requests.load(Ordering::SeqCst)
    }
}

pub fn start(files: Vec<RemoteFile>) -> DriveServer {
    start_with_options(files, DriveServerOptions::default())
}

pub fn start_with_options(files: Vec<RemoteFile>, opts: DriveServerOptions) -> DriveServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(State {
        base: format!("http://127.0.0.1:{}/", port),
        files,
        opts,
        token_requests: AtomicUsize::new(0),
        list_requests: AtomicUsize::new(0),
        content_requests: AtomicUsize::new(0),
    });
    let server_state = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&server_state);
            thread::spawn(move || handle(stream, &state));
        }
    });
    DriveServer { state }
}

struct Request {
    method: String,
    target: String,
    authorization: Option<String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&data[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let target = first.next()?.to_string();

    let mut authorization = None;
    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
        }
    }

    let mut body = data[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }

    Some(Request {
        method,
        target,
        authorization,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn respond_json(stream: &mut TcpStream, status: &str, value: &Value) {
    respond(stream, status, "application/json", value.to_string().as_bytes());
}

fn api_error(stream: &mut TcpStream, status: &str, code: u32, message: &str) {
    respond_json(
        stream,
        status,
        &json!({ "error": { "code": code, "message": message } }),
    );
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let req = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let url = match url::Url::parse(&format!("http://localhost{}", req.target)) {
        Ok(u) => u,
        Err(_) => return respond(&mut stream, "400 Bad Request", "text/plain", b"bad target"),
    };
    let path = url.path().to_string();

    if req.method == "POST" && path == "/token" {
        return handle_token(&mut stream, state, &req);
    }

    let expected = format!("Bearer {}", ACCESS_TOKEN);
    if req.authorization.as_deref() != Some(expected.as_str()) {
        return api_error(&mut stream, "401 Unauthorized", 401, "Invalid Credentials");
    }

    if req.method == "GET" && path == "/drive/v2/files" {
        return handle_list(&mut stream, state, &url);
    }
    if req.method == "GET" {
        if let Some(id) = path.strip_prefix("/download/") {
            return handle_content(&mut stream, state, id);
        }
        if let Some(id) = path.strip_prefix("/drive/v2/files/") {
            let alt_media = url.query_pairs().any(|(k, v)| k == "alt" && v == "media");
            if alt_media {
                return handle_content(&mut stream, state, id);
            }
        }
    }
    api_error(&mut stream, "404 Not Found", 404, "Not Found")
}

fn handle_token(stream: &mut TcpStream, state: &State, req: &Request) {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    if state.opts.reject_token {
        return respond_json(
            stream,
            "400 Bad Request",
            &json!({ "error": "invalid_grant", "error_description": "Invalid JWT Signature." }),
        );
    }
    let form: Vec<(String, String)> = url::form_urlencoded::parse(&req.body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let grant_ok = form.iter().any(|(k, v)| {
        k == "grant_type" && v == "urn:ietf:params:oauth:grant-type:jwt-bearer"
    });
    let assertion_ok = form
        .iter()
        .any(|(k, v)| k == "assertion" && v.split('.').count() == 3);
    if !grant_ok || !assertion_ok {
        return respond_json(
            stream,
            "400 Bad Request",
            &json!({ "error": "invalid_request" }),
        );
    }
    respond_json(
        stream,
        "200 OK",
        &json!({ "access_token": ACCESS_TOKEN, "token_type": "Bearer", "expires_in": 3599 }),
    )
}

fn handle_list(stream: &mut TcpStream, state: &State, url: &url::Url) {
    state.list_requests.fetch_add(1, Ordering::SeqCst);
    let mut q = String::new();
    let mut offset = 0usize;
    for (k, v) in url.query_pairs() {
        match k.as_ref() {
            "q" => q = v.into_owned(),
            "pageToken" => offset = v.trim_start_matches('p').parse().unwrap_or(0),
            _ => {}
        }
    }
    let expected_q = format!("'{}' in parents and trashed=false", FOLDER_ID);
    if q != expected_q {
        let message = format!("File not found: {}", q);
        return api_error(stream, "404 Not Found", 404, &message);
    }

    let end = (offset + state.opts.page_size).min(state.files.len());
    let items: Vec<Value> = state.files[offset.min(end)..end]
        .iter()
        .map(|f| {
            let mut item = json!({
                "kind": "drive#file",
                "id": f.id,
                "title": f.title,
                "mimeType": f.mime_type,
            });
            if let Some(content) = &f.content {
                item["fileSize"] = json!(content.len().to_string());
                if f.with_download_url {
                    item["downloadUrl"] = json!(format!("{}download/{}", state.base, f.id));
                }
            }
            item
        })
        .collect();

    let mut page = json!({ "kind": "drive#fileList", "items": items });
    if end < state.files.len() {
        page["nextPageToken"] = json!(format!("p{}", end));
    }
    respond_json(stream, "200 OK", &page)
}

fn handle_content(stream: &mut TcpStream, state: &State, id: &str) {
    state.content_requests.fetch_add(1, Ordering::SeqCst);
    match state.files.iter().find(|f| f.id == id) {
        Some(RemoteFile {
            content: Some(content),
            ..
        }) => respond(stream, "200 OK", "application/octet-stream", content),
        Some(_) => api_error(stream, "403 Forbidden", 403, "fileNotDownloadable"),
        None => api_error(stream, "404 Not Found", 404, "File not found"),
    }
}
