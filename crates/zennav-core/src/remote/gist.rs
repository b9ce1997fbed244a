//! GitHub Gists snapshot store
//!
//! The snapshot is a private gist containing one file, `zennav_config.json`.
//!
//! ## Endpoints
//!
//! - `GET /gists?per_page=100` - list the account's gists (lookup), following
//!   `Link: <...>; rel="next"` for up to `MAX_LIST_PAGES` pages
//! - `POST /gists` - create the snapshot
//! - `PATCH /gists/{id}` - overwrite the snapshot file
//! - `GET /gists/{id}` - read it back
//! - `GET /user` - credential check

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{
    parse_snapshot, snapshot_content, RemoteError, SnapshotLookup, SnapshotRef, SnapshotStore,
    SNAPSHOT_DESCRIPTION, SNAPSHOT_FILENAME,
};
use crate::config::Config;
use crate::models::SiteConfig;

const USER_AGENT: &str = concat!("zennav/", env!("CARGO_PKG_VERSION"));

/// Lookup gives up after this many pages of 100 gists
const MAX_LIST_PAGES: usize = 30;

/// Gist as returned by the API (only the fields we use)
#[derive(Debug, Deserialize)]
struct Gist {
    id: String,
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

/// Snapshot store backed by GitHub Gists
#[derive(Debug, Clone)]
pub struct GistClient {
    http: Client,
    base_url: String,
}

impl GistClient {
    /// Create a client for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for the configured API
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.gist_api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the credential is accepted by the API
    ///
    /// Any failure, including network errors, reads as "not valid".
    pub async fn verify_credential(&self, credential: &str) -> bool {
        let headers = match auth_headers(credential) {
            Ok(headers) => headers,
            Err(e) => {
                debug!("Credential check skipped: {}", e);
                return false;
            }
        };

        let url = format!("{}/user", self.base_url);
        match self.http.get(&url).headers(headers).send()
            .await
        {
            Ok(res) => res.status().is_success(),
            Err(e) => {
                debug!("Credential check failed: {}", e);
                false
            }
        }
    }

    async fn list_gists(&self, credential: &str) -> Result<Vec<Gist>, String> {
        let headers = auth_headers(credential)?;
        let mut gists = Vec::new();
        let mut next = Some(format!("{}/gists?per_page=100", self.base_url));
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_LIST_PAGES {
                warn!("Stopped listing gists after {} pages", MAX_LIST_PAGES);
                break;
            }
            pages += 1;

            let res = self
                .http
                .get(&url)
                .headers(headers.clone())
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let res = ensure_success(res).await?;
            next = next_page(res.headers());
            let page = res.json::<Vec<Gist>>().await.map_err(|e| e.to_string())?;
            debug!("Listed {} gists on page {}", page.len(), pages);
            gists.extend(page);
        }

        Ok(gists)
    }

    async fn fetch_gist(&self, credential: &str, id: &str) -> Result<Gist, RemoteError> {
        let headers = auth_headers(credential).map_err(RemoteError::Read)?;
        let url = format!("{}/gists/{}", self.base_url, id);
        let res = self
            .http
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| RemoteError::Read(e.to_string()))?;

        let res = ensure_success(res).await.map_err(RemoteError::Read)?;
        res.json::<Gist>()
            .await
            .map_err(|e| RemoteError::Read(e.to_string()))
    }

    async fn fetch_raw(&self, credential: &str, raw_url: &str) -> Result<String, RemoteError> {
        let headers = auth_headers(credential).map_err(RemoteError::Read)?;
        let res = self
            .http
            .get(raw_url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| RemoteError::Read(e.to_string()))?;

        let res = ensure_success(res).await.map_err(RemoteError::Read)?;
        res.text()
            .await
            .map_err(|e| RemoteError::Read(e.to_string()))
    }

    async fn write(
        &self,
        request: reqwest::RequestBuilder,
        body: &Value,
    ) -> Result<SnapshotRef, RemoteError> {
        let res = request
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Write(e.to_string()))?;

        let res = ensure_success(res).await.map_err(RemoteError::Write)?;
        let gist = res
            .json::<Gist>()
            .await
            .map_err(|e| RemoteError::Write(format!("unexpected response: {}", e)))?;
        Ok(SnapshotRef::new(gist.id))
    }
}

#[async_trait]
impl SnapshotStore for GistClient {
    async fn find_snapshot(&self, credential: &str) -> SnapshotLookup {
        match self.list_gists(credential).await {
            Ok(gists) => match select_snapshot(&gists) {
                Some(snapshot) => {
                    debug!("Found snapshot gist {}", snapshot);
                    SnapshotLookup::Found(snapshot)
                }
                None => SnapshotLookup::NotFound,
            },
            Err(reason) => {
                warn!("Snapshot lookup failed: {}", reason);
                SnapshotLookup::Failed(reason)
            }
        }
    }

    async fn create_snapshot(
        &self,
        credential: &str,
        config: &SiteConfig,
    ) -> Result<SnapshotRef, RemoteError> {
        let headers = auth_headers(credential).map_err(RemoteError::Write)?;
        let body = create_body(config)?;
        let url = format!("{}/gists", self.base_url);
        let request = self.http.post(&url).headers(headers);

        let snapshot = self.write(request, &body).await?;
        info!("Created snapshot gist {}", snapshot);
        Ok(snapshot)
    }

    async fn update_snapshot(
        &self,
        credential: &str,
        snapshot: &SnapshotRef,
        config: &SiteConfig,
    ) -> Result<SnapshotRef, RemoteError> {
        let headers = auth_headers(credential).map_err(RemoteError::Write)?;
        let body = update_body(config)?;
        let url = format!("{}/gists/{}", self.base_url, snapshot.id);
        let request = self.http.patch(&url).headers(headers);

        let updated = self.write(request, &body).await?;
        info!("Updated snapshot gist {}", updated);
        Ok(updated)
    }

    async fn read_snapshot(
        &self,
        credential: &str,
        snapshot: &SnapshotRef,
    ) -> Result<SiteConfig, RemoteError> {
        let gist = self.fetch_gist(credential, &snapshot.id).await?;

        let content = match snapshot_file(&gist)? {
            FileContent::Inline(content) => content,
            FileContent::Truncated(raw_url) => {
                debug!("Snapshot content truncated, fetching {}", raw_url);
                self.fetch_raw(credential, &raw_url).await?
            }
        };

        parse_snapshot(&content)
    }
}

/// Request headers carrying the credential
///
/// A credential that cannot be sent as a header is an error; a request
/// without it would be answered anonymously.
fn auth_headers(credential: &str) -> Result<HeaderMap, String> {
    let value = HeaderValue::from_str(&format!("token {}", credential))
        .map_err(|_| "token contains characters not allowed in an HTTP header".to_string())?;

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// URL of the next page from a `Link` response header
fn next_page(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let url = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;
        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
                .unwrap_or(false)
        });
        is_next.then(|| url.to_string())
    })
}

/// Turn a non-2xx response into an error message including the API's message
async fn ensure_success(res: Response) -> Result<Response, String> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let detail = res
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));

    Err(match detail {
        Some(msg) => format!("HTTP {}: {}", status, msg),
        None => format!("HTTP {}", status),
    })
}

/// Pick the gist holding our snapshot file
fn select_snapshot(gists: &[Gist]) -> Option<SnapshotRef> {
    gists
        .iter()
        .find(|g| g.files.contains_key(SNAPSHOT_FILENAME))
        .map(|g| SnapshotRef::new(g.id.clone()))
}

fn create_body(config: &SiteConfig) -> Result<Value, RemoteError> {
    Ok(json!({
        "description": SNAPSHOT_DESCRIPTION,
        "public": false,
        "files": {
            SNAPSHOT_FILENAME: { "content": snapshot_content(config)? }
        }
    }))
}

fn update_body(config: &SiteConfig) -> Result<Value, RemoteError> {
    Ok(json!({
        "files": {
            SNAPSHOT_FILENAME: { "content": snapshot_content(config)? }
        }
    }))
}

#[derive(Debug, PartialEq)]
enum FileContent {
    Inline(String),
    Truncated(String),
}

fn snapshot_file(gist: &Gist) -> Result<FileContent, RemoteError> {
    let file = gist
        .files
        .get(SNAPSHOT_FILENAME)
        .ok_or_else(|| RemoteError::Read(format!("{} not found in gist", SNAPSHOT_FILENAME)))?;

    if file.truncated {
        if let Some(raw_url) = &file.raw_url {
            return Ok(FileContent::Truncated(raw_url.clone()));
        }
    }

    match &file.content {
        Some(content) if !content.is_empty() => Ok(FileContent::Inline(content.clone())),
        _ => Err(RemoteError::Read(format!(
            "{} has no content",
            SNAPSHOT_FILENAME
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gists_from(json: &str) -> Vec<Gist> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_select_snapshot_by_filename() {
        let gists = gists_from(
            r#"[
                {"id": "aaa", "files": {"notes.md": {"filename": "notes.md"}}},
                {"id": "bbb", "files": {"zennav_config.json": {"filename": "zennav_config.json"}}},
                {"id": "ccc", "files": {"zennav_config.json": {}}}
            ]"#,
        );

        assert_eq!(select_snapshot(&gists), Some(SnapshotRef::new("bbb")));
    }

    #[test]
    fn test_select_snapshot_absent() {
        let gists = gists_from(r#"[{"id": "aaa", "files": {"other.json": {}}}, {"id": "b"}]"#);
        assert_eq!(select_snapshot(&gists), None);
        assert_eq!(select_snapshot(&[]), None);
    }

    #[test]
    fn test_create_body_shape() {
        let config = SiteConfig::default();
        let body = create_body(&config).unwrap();

        assert_eq!(body["description"], SNAPSHOT_DESCRIPTION);
        assert_eq!(body["public"], false);
        let content = body["files"][SNAPSHOT_FILENAME]["content"].as_str().unwrap();
        assert_eq!(parse_snapshot(content).unwrap(), config);
    }

    #[test]
    fn test_update_body_only_touches_file() {
        let body = update_body(&SiteConfig::default()).unwrap();
        assert!(body.get("description").is_none());
        assert!(body.get("public").is_none());
        assert!(body["files"][SNAPSHOT_FILENAME]["content"].is_string());
    }

    #[test]
    fn test_snapshot_file_inline() {
        let gist: Gist = serde_json::from_str(
            r#"{"id": "x", "files": {"zennav_config.json": {"content": "{}", "truncated": false}}}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot_file(&gist).unwrap(),
            FileContent::Inline("{}".to_string())
        );
    }

    #[test]
    fn test_snapshot_file_truncated() {
        let gist: Gist = serde_json::from_str(
            r#"{"id": "x", "files": {"zennav_config.json": {
                "content": "{\"ti", "truncated": true, "raw_url": "https://gist.example/raw"
            }}}"#,
        )
        .unwrap();
        assert_eq!(
            snapshot_file(&gist).unwrap(),
            FileContent::Truncated("https://gist.example/raw".to_string())
        );
    }

    #[test]
    fn test_snapshot_file_missing() {
        let gist: Gist =
            serde_json::from_str(r#"{"id": "x", "files": {"other.json": {"content": "{}"}}}"#)
                .unwrap();
        assert!(matches!(snapshot_file(&gist), Err(RemoteError::Read(_))));
    }

    #[test]
    fn test_auth_headers() {
        let headers = auth_headers("tok1").unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "token tok1");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/vnd.github+json");

        assert!(auth_headers("bad\ntoken").is_err());
        assert!(auth_headers("tok\u{7f}").is_err());
    }

    #[test]
    fn test_next_page_from_link_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(next_page(&headers), None);

        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/gists?per_page=100&page=2>; rel="next", <https://api.github.com/gists?per_page=100&page=5>; rel="last""#,
            ),
        );
        assert_eq!(
            next_page(&headers).as_deref(),
            Some("https://api.github.com/gists?per_page=100&page=2")
        );

        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://api.github.com/gists?page=1>; rel="prev", <https://api.github.com/gists?page=1>; rel="first""#,
            ),
        );
        assert_eq!(next_page(&headers), None);
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = GistClient::new("http://localhost:1234/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    /// Minimal HTTP/1.1 server answering canned responses per method and target
    mod stub {
        use std::sync::{Arc, Mutex};

        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::{TcpListener, TcpStream};

        pub struct Route {
            method: &'static str,
            target: String,
            status: u16,
            body: String,
            headers: Vec<(String, String)>,
        }

        impl Route {
            pub fn new(
                method: &'static str,
                target: impl Into<String>,
                status: u16,
                body: impl Into<String>,
            ) -> Self {
                Self {
                    method,
                    target: target.into(),
                    status,
                    body: body.into(),
                    headers: Vec::new(),
                }
            }

            pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
                self.headers.push((name.to_string(), value.into()));
                self
            }
        }

        pub struct Stub {
            pub base_url: String,
            requests: Arc<Mutex<Vec<String>>>,
        }

        impl Stub {
            /// Bind to a free local port; routes may embed the base URL
            pub async fn start(routes: impl FnOnce(&str) -> Vec<Route>) -> Self {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                let base_url = format!("http://{}", listener.local_addr().unwrap());
                let routes = Arc::new(routes(&base_url));
                let requests = Arc::new(Mutex::new(Vec::new()));

                let recorded = requests.clone();
                tokio::spawn(async move {
                    while let Ok((socket, _)) = listener.accept().await {
                        let routes = routes.clone();
                        let recorded = recorded.clone();
                        tokio::spawn(async move { serve(socket, &routes, &recorded).await });
                    }
                });

                Self { base_url, requests }
            }

            /// Raw requests received so far, head and body
            pub fn requests(&self) -> Vec<String> {
                self.requests.lock().unwrap().clone()
            }
        }

        async fn serve(mut socket: TcpStream, routes: &[Route], recorded: &Mutex<Vec<String>>) {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let head_end = loop {
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    return;
                }
                buf.extend_from_slice(&chunk[..n]);
            };

            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < head_end + length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let mut request_line = head.split_whitespace();
            let method = request_line.next().unwrap_or_default().to_string();
            let target = request_line.next().unwrap_or_default().to_string();
            recorded
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(&buf).to_string());

            let response = match routes
                .iter()
                .find(|r| r.method == method && r.target == target)
            {
                Some(route) => render(route.status, &route.body, &route.headers),
                None => render(404, r#"{"message": "Not Found"}"#, &[]),
            };
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }

        fn render(status: u16, body: &str, headers: &[(String, String)]) -> String {
            let extra: String = headers
                .iter()
                .map(|(name, value)| format!("{}: {}\r\n", name, value))
                .collect();
            format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
                status,
                body.len(),
                extra,
                body
            )
        }
    }

    use stub::{Route, Stub};

    fn client_for(stub: &Stub) -> GistClient {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .unwrap();
        GistClient {
            http,
            base_url: stub.base_url.clone(),
        }
    }

    const SNAPSHOT_LIST: &str = r#"[{"id": "g1", "files": {"zennav_config.json": {}}}]"#;

    #[tokio::test]
    async fn test_unsendable_credential_never_reaches_api() {
        let stub = Stub::start(|_| {
            vec![
                Route::new("GET", "/gists?per_page=100", 200, SNAPSHOT_LIST),
                Route::new("GET", "/user", 200, "{}"),
            ]
        })
        .await;
        let client = client_for(&stub);
        let snapshot = SnapshotRef::new("g1");

        assert!(matches!(
            client.find_snapshot("bad\ntoken").await,
            SnapshotLookup::Failed(_)
        ));
        assert!(matches!(
            client
                .create_snapshot("bad\ntoken", &SiteConfig::default())
                .await,
            Err(RemoteError::Write(_))
        ));
        assert!(matches!(
            client
                .update_snapshot("bad\ntoken", &snapshot, &SiteConfig::default())
                .await,
            Err(RemoteError::Write(_))
        ));
        assert!(matches!(
            client.read_snapshot("bad\ntoken", &snapshot).await,
            Err(RemoteError::Read(_))
        ));
        assert!(!client.verify_credential("bad\ntoken").await);

        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_sends_token() {
        let stub = Stub::start(|_| {
            vec![Route::new("GET", "/gists?per_page=100", 200, SNAPSHOT_LIST)]
        })
        .await;
        let client = client_for(&stub);

        assert_eq!(
            client.find_snapshot("tok1").await,
            SnapshotLookup::Found(SnapshotRef::new("g1"))
        );
        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .to_ascii_lowercase()
            .contains("authorization: token tok1"));
    }

    #[tokio::test]
    async fn test_lookup_rejected_listing_is_failed_not_absent() {
        let stub = Stub::start(|_| {
            vec![Route::new(
                "GET",
                "/gists?per_page=100",
                401,
                r#"{"message": "Bad credentials"}"#,
            )]
        })
        .await;
        let client = client_for(&stub);

        match client.find_snapshot("tok1").await {
            SnapshotLookup::Failed(reason) => {
                assert!(reason.contains("401"), "{}", reason);
                assert!(reason.contains("Bad credentials"), "{}", reason);
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lookup_empty_listing_is_not_found() {
        let stub =
            Stub::start(|_| vec![Route::new("GET", "/gists?per_page=100", 200, "[]")]).await;
        let client = client_for(&stub);

        assert_eq!(client.find_snapshot("tok1").await, SnapshotLookup::NotFound);
    }

    #[tokio::test]
    async fn test_lookup_follows_next_page() {
        let stub = Stub::start(|base| {
            vec![
                Route::new(
                    "GET",
                    "/gists?per_page=100",
                    200,
                    r#"[{"id": "a", "files": {"notes.md": {}}}]"#,
                )
                .header(
                    "Link",
                    format!(r#"<{}/gists?per_page=100&page=2>; rel="next""#, base),
                ),
                Route::new(
                    "GET",
                    "/gists?per_page=100&page=2",
                    200,
                    r#"[{"id": "b", "files": {"zennav_config.json": {}}}]"#,
                ),
            ]
        })
        .await;
        let client = client_for(&stub);

        assert_eq!(
            client.find_snapshot("tok1").await,
            SnapshotLookup::Found(SnapshotRef::new("b"))
        );
        assert_eq!(stub.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_create_returns_new_id() {
        let stub =
            Stub::start(|_| vec![Route::new("POST", "/gists", 201, r#"{"id": "new1"}"#)]).await;
        let client = client_for(&stub);

        let created = client
            .create_snapshot("tok1", &SiteConfig::default())
            .await
            .unwrap();
        assert_eq!(created, SnapshotRef::new("new1"));

        let requests = stub.requests();
        assert!(requests[0].contains(SNAPSHOT_FILENAME));
        assert!(requests[0].contains(r#""public":false"#));
    }

    #[tokio::test]
    async fn test_create_rejected_is_write_error() {
        let stub = Stub::start(|_| {
            vec![Route::new(
                "POST",
                "/gists",
                403,
                r#"{"message": "Resource not accessible by personal access token"}"#,
            )]
        })
        .await;
        let client = client_for(&stub);

        match client.create_snapshot("tok1", &SiteConfig::default()).await {
            Err(RemoteError::Write(msg)) => {
                assert!(msg.starts_with("HTTP 403"), "{}", msg);
                assert!(msg.contains("Resource not accessible"), "{}", msg);
            }
            other => panic!("expected write error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_missing_gist_is_write_error() {
        let stub = Stub::start(|_| Vec::new()).await;
        let client = client_for(&stub);

        let result = client
            .update_snapshot("tok1", &SnapshotRef::new("gone"), &SiteConfig::default())
            .await;
        match result {
            Err(RemoteError::Write(msg)) => assert!(msg.contains("Not Found"), "{}", msg),
            other => panic!("expected write error, got {:?}", other),
        }
        assert!(stub.requests()[0].starts_with("PATCH /gists/gone "));
    }

    #[tokio::test]
    async fn test_read_server_error_is_read_error() {
        let stub = Stub::start(|_| vec![Route::new("GET", "/gists/g1", 500, "oops")]).await;
        let client = client_for(&stub);

        match client.read_snapshot("tok1", &SnapshotRef::new("g1")).await {
            Err(RemoteError::Read(msg)) => assert!(msg.starts_with("HTTP 500"), "{}", msg),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_gist_without_snapshot_file_is_read_error() {
        let stub = Stub::start(|_| {
            vec![Route::new(
                "GET",
                "/gists/g1",
                200,
                r#"{"id": "g1", "files": {"other.json": {"content": "{}"}}}"#,
            )]
        })
        .await;
        let client = client_for(&stub);

        assert!(matches!(
            client.read_snapshot("tok1", &SnapshotRef::new("g1")).await,
            Err(RemoteError::Read(_))
        ));
    }

    #[tokio::test]
    async fn test_read_truncated_file_fetches_raw_url() {
        let config = SiteConfig::default();
        let content = snapshot_content(&config).unwrap();
        let stub = Stub::start(|base| {
            let gist = json!({
                "id": "g1",
                "files": {
                    SNAPSHOT_FILENAME: {
                        "content": "{\"ti",
                        "truncated": true,
                        "raw_url": format!("{}/raw/{}", base, SNAPSHOT_FILENAME)
                    }
                }
            });
            vec![
                Route::new("GET", "/gists/g1", 200, gist.to_string()),
                Route::new("GET", format!("/raw/{}", SNAPSHOT_FILENAME), 200, content),
            ]
        })
        .await;
        let client = client_for(&stub);

        let read = client
            .read_snapshot("tok1", &SnapshotRef::new("g1"))
            .await
            .unwrap();
        assert_eq!(read, config);
        assert_eq!(stub.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_verify_credential_uses_user_endpoint() {
        let stub = Stub::start(|_| vec![Route::new("GET", "/user", 200, "{}")]).await;
        assert!(client_for(&stub).verify_credential("tok1").await);

        let stub = Stub::start(|_| Vec::new()).await;
        assert!(!client_for(&stub).verify_credential("tok1").await);
    }
}
