//! Method dispatch and resource handlers.

use crate::http::{
    request::Request,
    response::Response,
    types::{guess_content_type, Method, StatusCode},
};
use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, info};

/// In-memory store for accepted form submissions, name to identifier.
///
/// Owned by the [`Dispatcher`] and mutated only from the POST handler, so
/// the strictly sequential serving model needs no synchronization around it.
#[derive(Debug, Default)]
pub struct SubmissionStore {
    entries: HashMap<String, String>,
}

impl SubmissionStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a submission, replacing any previous identifier for the name.
    #[inline]
    pub fn insert(&mut self, name: String, mis: String) {
        self.entries.insert(name, mis);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns one raw request buffer into one complete response buffer.
///
/// Owns the [`SubmissionStore`] and the document root all file paths are
/// resolved against.
#[derive(Debug)]
pub struct Dispatcher {
    root: PathBuf,
    store: SubmissionStore,
}

impl Dispatcher {
    #[inline]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            store: SubmissionStore::new(),
        }
    }

    #[inline]
    pub fn store(&self) -> &SubmissionStore {
        &self.store
    }

    /// Handles one request buffer end to end.
    ///
    /// Never fails: parse errors and handler misses all map to their fixed
    /// 400/404/501 responses, so the caller always has bytes to write back.
    pub async fn dispatch(&mut self, raw: &[u8]) -> Vec<u8> {
        let request = match Request::parse(raw) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "rejecting malformed request");
                return Response::new(StatusCode::BadRequest)
                    .body("<h1>400 Bad Request: Invalid HTTP request</h1>")
                    .into_bytes();
            }
        };

        let response = match request.method() {
            Method::Options => Self::handle_options(),
            Method::Get => self.handle_get(&request).await,
            Method::Post => self.handle_post(&request),
            Method::Delete => self.handle_delete(&request).await,
            Method::Unsupported => {
                Response::new(StatusCode::NotImplemented).body("<h1>501 Not Implemented</h1>")
            }
        };

        response.into_bytes()
    }

    #[inline]
    fn handle_options() -> Response {
        Response::new(StatusCode::Ok).header("Allow", "OPTIONS, GET, POST")
    }

    async fn handle_get(&self, request: &Request) -> Response {
        let mut relative = request.path().trim_matches('/');
        if relative.is_empty() {
            relative = "index.html";
        }

        let Some(path) = self.resolve(relative) else {
            return Self::not_found();
        };

        match fs::read(&path).await {
            Ok(bytes) => Response::new(StatusCode::Ok)
                .header("Content-Type", guess_content_type(relative))
                .body(bytes),
            Err(_) => Self::not_found(),
        }
    }

    fn handle_post(&mut self, request: &Request) -> Response {
        if request.path().trim_matches('/') != "submit" {
            return Self::not_found();
        }

        let name = request.form().get("name").and_then(|v| v.first());
        let mis = request.form().get("mis").and_then(|v| v.first());

        let (Some(name), Some(mis)) = (name, mis) else {
            return Response::new(StatusCode::BadRequest)
                .body(r#"<h1>400 Bad Request: Missing "name" or "mis" parameter</h1>"#);
        };

        if name.is_empty() || mis.is_empty() {
            return Response::new(StatusCode::BadRequest)
                .body(r#"<h1>400 Bad Request: "name" and "mis" parameters cannot be empty</h1>"#);
        }

        // Stored raw; the `+` to space rewrite is display-only.
        self.store.insert(name.clone(), mis.clone());
        info!(name = %name, "stored submission");

        let display = name.replace('+', " ");
        Response::new(StatusCode::Ok).body(format!(
            "<h1>Student data submitted successfully. Name: {display}, MIS: {mis}</h1>"
        ))
    }

    async fn handle_delete(&self, request: &Request) -> Response {
        let relative = request.path().trim_matches('/');

        let Some(path) = self.resolve(relative) else {
            return Self::not_found();
        };

        match fs::metadata(&path).await {
            Ok(meta) if !meta.is_dir() => match fs::remove_file(&path).await {
                Ok(()) => {
                    info!(path = %relative, "deleted resource");
                    Response::new(StatusCode::Ok)
                        .body(format!("<h1>Resource {relative} deleted successfully</h1>"))
                }
                Err(_) => Self::not_found(),
            },
            _ => Self::not_found(),
        }
    }

    // Confines a stripped request path to the document root. Anything that
    // is not a plain chain of normal components (`..`, `.`, absolute paths)
    // resolves to nothing and gets the 404 treatment.
    #[inline]
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        if relative.is_empty() {
            return None;
        }

        let candidate = Path::new(relative);
        if !candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }

        Some(self.root.join(candidate))
    }

    #[inline]
    fn not_found() -> Response {
        Response::new(StatusCode::NotFound).body("<h1>404 Not Found</h1>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn dispatcher() -> (Dispatcher, TempDir) {
        let dir = tempdir().unwrap();
        let dispatcher = Dispatcher::new(dir.path());
        (dispatcher, dir)
    }

    fn status_of(bytes: &[u8]) -> &str {
        let text = std::str::from_utf8(bytes).unwrap();
        text.split("\r\n").next().unwrap()
    }

    fn body_of(bytes: &[u8]) -> &[u8] {
        let pos = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no blank line");
        &bytes[pos + 4..]
    }

    #[tokio::test]
    async fn options_lists_allowed_methods() {
        let (mut d, _dir) = dispatcher();

        let resp = d.dispatch(b"OPTIONS / HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 200 OK");
        assert!(std::str::from_utf8(&resp)
            .unwrap()
            .contains("Allow: OPTIONS, GET, POST\r\n"));
        assert!(body_of(&resp).is_empty());
    }

    #[tokio::test]
    async fn get_serves_file_bytes() {
        let (mut d, dir) = dispatcher();
        let content = b"hello from disk\n";
        std::fs::write(dir.path().join("hello.txt"), content).unwrap();

        let resp = d.dispatch(b"GET /hello.txt HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 200 OK");
        assert!(std::str::from_utf8(&resp)
            .unwrap()
            .contains("Content-Type: text/plain\r\n"));
        assert_eq!(body_of(&resp), content);
    }

    #[tokio::test]
    async fn get_empty_path_serves_index() {
        let (mut d, dir) = dispatcher();
        std::fs::write(dir.path().join("index.html"), "<p>home</p>").unwrap();

        let resp = d.dispatch(b"GET / HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 200 OK");
        assert_eq!(body_of(&resp), b"<p>home</p>");
    }

    #[tokio::test]
    async fn get_missing_file_is_404() {
        let (mut d, _dir) = dispatcher();

        let resp = d.dispatch(b"GET /nothing.html HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 404 Not Found");
        assert_eq!(body_of(&resp), b"<h1>404 Not Found</h1>");
    }

    #[tokio::test]
    async fn get_rejects_parent_traversal() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "keep out").unwrap();
        let mut d = Dispatcher::new(&root);

        let resp = d.dispatch(b"GET /../secret.txt HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 404 Not Found");
    }

    #[tokio::test]
    async fn post_stores_raw_and_displays_decoded() {
        let (mut d, _dir) = dispatcher();
        let raw = b"POST /submit HTTP/1.1\r\n\r\nname=John+Doe&mis=123";

        let resp = d.dispatch(raw).await;

        assert_eq!(status_of(&resp), "HTTP/1.1 200 OK");
        assert_eq!(
            body_of(&resp),
            b"<h1>Student data submitted successfully. Name: John Doe, MIS: 123</h1>"
        );
        assert_eq!(d.store().get("John Doe"), None);
        assert_eq!(d.store().get("John+Doe"), Some("123"));
    }

    #[tokio::test]
    async fn post_missing_parameter_is_400() {
        let (mut d, _dir) = dispatcher();

        let resp = d.dispatch(b"POST /submit HTTP/1.1\r\n\r\nname=Alice").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 400 Bad Request");
        assert_eq!(
            body_of(&resp),
            br#"<h1>400 Bad Request: Missing "name" or "mis" parameter</h1>"#
        );
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn post_empty_body_is_missing_parameter() {
        let (mut d, _dir) = dispatcher();

        let resp = d.dispatch(b"POST /submit HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 400 Bad Request");
        assert_eq!(
            body_of(&resp),
            br#"<h1>400 Bad Request: Missing "name" or "mis" parameter</h1>"#
        );
    }

    #[tokio::test]
    async fn post_empty_parameter_is_400() {
        let (mut d, _dir) = dispatcher();

        let resp = d.dispatch(b"POST /submit HTTP/1.1\r\n\r\nname=&mis=123").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 400 Bad Request");
        assert_eq!(
            body_of(&resp),
            br#"<h1>400 Bad Request: "name" and "mis" parameters cannot be empty</h1>"#
        );
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn post_to_other_path_is_404() {
        let (mut d, _dir) = dispatcher();

        let resp = d.dispatch(b"POST /other HTTP/1.1\r\n\r\nname=A&mis=1").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 404 Not Found");
        assert!(d.store().is_empty());
    }

    #[tokio::test]
    async fn delete_then_get_is_404() {
        let (mut d, dir) = dispatcher();
        std::fs::write(dir.path().join("victim.txt"), "bye").unwrap();

        let resp = d.dispatch(b"DELETE /victim.txt HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 200 OK");
        assert_eq!(
            body_of(&resp),
            b"<h1>Resource victim.txt deleted successfully</h1>"
        );

        let resp = d.dispatch(b"GET /victim.txt HTTP/1.1\r\n\r\n").await;
        assert_eq!(status_of(&resp), "HTTP/1.1 404 Not Found");
    }

    #[tokio::test]
    async fn delete_directory_is_404() {
        let (mut d, dir) = dispatcher();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let resp = d.dispatch(b"DELETE /subdir HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 404 Not Found");
        assert!(dir.path().join("subdir").is_dir());
    }

    #[tokio::test]
    async fn delete_root_path_is_404() {
        let (mut d, _dir) = dispatcher();

        let resp = d.dispatch(b"DELETE / HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 404 Not Found");
    }

    #[tokio::test]
    async fn delete_rejects_parent_traversal() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "keep out").unwrap();
        let mut d = Dispatcher::new(&root);

        let resp = d.dispatch(b"DELETE /../secret.txt HTTP/1.1\r\n\r\n").await;

        assert_eq!(status_of(&resp), "HTTP/1.1 404 Not Found");
        assert!(dir.path().join("secret.txt").is_file());
    }

    #[tokio::test]
    async fn unsupported_method_is_501() {
        let (mut d, _dir) = dispatcher();

        for raw in [
            &b"PATCH /x HTTP/1.1\r\n\r\n"[..],
            &b"HEAD / HTTP/1.1\r\n\r\n"[..],
            &b"PUT /x HTTP/1.1\r\n\r\n"[..],
        ] {
            let resp = d.dispatch(raw).await;

            assert_eq!(status_of(&resp), "HTTP/1.1 501 Not Implemented");
            assert_eq!(body_of(&resp), b"<h1>501 Not Implemented</h1>");
        }
    }

    #[tokio::test]
    async fn parse_failure_is_generic_400() {
        let (mut d, _dir) = dispatcher();

        for raw in [
            &b"GET / HTTP/1.1\r\nNoColon\r\n\r\n"[..],
            &b"POST /submit HTTP/1.1\r\n\r\nnoequals"[..],
            &b"\r\n\r\n"[..],
        ] {
            let resp = d.dispatch(raw).await;

            assert_eq!(status_of(&resp), "HTTP/1.1 400 Bad Request");
            assert_eq!(
                body_of(&resp),
                b"<h1>400 Bad Request: Invalid HTTP request</h1>"
            );
        }
    }
}
