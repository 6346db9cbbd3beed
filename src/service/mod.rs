//! The file-serving service: ties the transport to the routing core.
//!
//! [`FileServer::handle`] is the handler given to the transport. The literal
//! `/` path short-circuits to the server info page; other `GET` paths go
//! through the resolver and the case chain; `POST` is a stub that echoes the
//! body back. Every per-request failure becomes an HTML error page — the
//! process itself never dies on a request.

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::info;

use crate::cases::{CaseChain, Outcome, ServeError};
use crate::http::{Method, Request, Response, StatusCode};
use crate::pages;
use crate::resolve::{PathResolver, ResolveError};

/// The request handler: resolver + case chain + response mapping.
///
/// Cheap to clone; the chain is shared behind an [`Arc`] and the resolver
/// holds only the canonicalized root path.
#[derive(Debug, Clone)]
pub struct FileServer {
    resolver: PathResolver,
    chain: Arc<CaseChain>,
}

impl FileServer {
    /// Creates a service rooted at `root` with the default case chain.
    ///
    /// # Errors
    ///
    /// Fails if `root` does not exist or cannot be canonicalized.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_chain(root, CaseChain::new())
    }

    /// Creates a service with an explicit case chain.
    pub fn with_chain(root: impl AsRef<Path>, chain: CaseChain) -> io::Result<Self> {
        Ok(Self {
            resolver: PathResolver::new(root)?,
            chain: Arc::new(chain),
        })
    }

    /// Returns the canonicalized document root.
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Handles one request and logs method, path, status, and duration.
    pub async fn handle(&self, request: Request, peer: SocketAddr) -> Response {
        let start = Instant::now();
        let method = request.method().as_str().to_owned();
        let path = request.path().to_owned();

        let response = self.dispatch(&request, peer).await;

        info!(
            %method,
            %path,
            status = response.status().as_u16(),
            elapsed = ?start.elapsed(),
            "request handled"
        );
        response
    }

    async fn dispatch(&self, request: &Request, peer: SocketAddr) -> Response {
        match request.method() {
            Method::Get => self.get(request, peer).await,
            Method::Post => post_echo(request),
            _ => Response::new(StatusCode::MethodNotAllowed).body("Method Not Allowed"),
        }
    }

    /// Drives a GET request through the resolver and the case chain.
    ///
    /// The literal `/` path is answered with the info page before any
    /// filesystem resolution happens.
    async fn get(&self, request: &Request, peer: SocketAddr) -> Response {
        let raw_path = request.path();
        if raw_path == "/" {
            let page = pages::root_page(peer, request.method().as_str(), raw_path);
            return Response::html(StatusCode::Ok, page);
        }

        let outcome = match self.resolver.resolve(raw_path).await {
            Ok(ctx) => self.chain.resolve(&ctx).await,
            Err(e) => Err(resolve_error(raw_path, e)),
        };
        respond(raw_path, outcome)
    }
}

/// Maps a resolver failure into the serve-error taxonomy. Traversal keeps
/// its generic message so the error page leaks nothing.
fn resolve_error(raw_path: &str, err: ResolveError) -> ServeError {
    match err {
        ResolveError::Traversal => ServeError::Traversal,
        ResolveError::Canonicalize { source, .. } => ServeError::Io {
            path: raw_path.to_owned(),
            source,
        },
    }
}

/// Maps an [`Outcome`] to a transport response: content as a 200 with its
/// content type, errors as the HTML error page with the error's status.
fn respond(raw_path: &str, outcome: Outcome) -> Response {
    match outcome {
        Ok(body) => Response::new(StatusCode::Ok)
            .content_type(body.content_type)
            .body_bytes(body.bytes),
        Err(e) => Response::html(e.status(), pages::error_page(raw_path, &e.to_string())),
    }
}

/// The POST stub: reads the full body and echoes it back prefixed with
/// `Received: `.
fn post_echo(request: &Request) -> Response {
    let mut body = Vec::with_capacity(10 + request.body().len());
    body.extend_from_slice(b"Received: ");
    body.extend_from_slice(request.body());
    Response::new(StatusCode::Ok)
        .content_type("text/plain")
        .body_bytes(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn request(raw: &str) -> Request {
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        req
    }

    fn service() -> (tempfile::TempDir, FileServer) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("hello.txt"), b"hello world").unwrap();
        fs::write(root.join("page.html"), b"<h1>page</h1>").unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("docs/a.txt"), b"a").unwrap();
        let server = FileServer::new(root).unwrap();
        (dir, server)
    }

    fn body_text(response: Response) -> String {
        String::from_utf8(response.body_ref().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn root_path_serves_info_page() {
        let (_dir, server) = service();
        let res = server
            .handle(request("GET / HTTP/1.1\r\nHost: x\r\n\r\n"), peer())
            .await;
        assert_eq!(res.status(), StatusCode::Ok);
        let body = body_text(res);
        assert!(body.contains("<h1>Server Information</h1>"));
        assert!(body.contains("<td>127.0.0.1</td>"));
        assert!(body.contains("<td>40000</td>"));
        assert!(body.contains("<td>GET</td>"));
    }

    #[tokio::test]
    async fn existing_file_served_with_contents() {
        let (_dir, server) = service();
        let res = server
            .handle(request("GET /hello.txt HTTP/1.1\r\nHost: x\r\n\r\n"), peer())
            .await;
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.body_ref().as_ref(), b"hello world");
    }

    #[tokio::test]
    async fn missing_file_renders_error_page() {
        let (_dir, server) = service();
        let res = server
            .handle(
                request("GET /missing.txt HTTP/1.1\r\nHost: x\r\n\r\n"),
                peer(),
            )
            .await;
        assert_eq!(res.status(), StatusCode::NotFound);
        let body = body_text(res);
        assert!(body.contains("Error accessing /missing.txt"));
        assert!(body.contains("not found"));
    }

    #[tokio::test]
    async fn traversal_is_generic_404() {
        let (_dir, server) = service();
        let res = server
            .handle(
                request("GET /../../etc/passwd HTTP/1.1\r\nHost: x\r\n\r\n"),
                peer(),
            )
            .await;
        assert_eq!(res.status(), StatusCode::NotFound);
        let body = body_text(res);
        assert!(body.contains("not found"));
        assert!(!body.contains("traversal"));
    }

    #[tokio::test]
    async fn directory_without_index_lists_entries() {
        let (_dir, server) = service();
        let res = server
            .handle(request("GET /docs HTTP/1.1\r\nHost: x\r\n\r\n"), peer())
            .await;
        assert_eq!(res.status(), StatusCode::Ok);
        let body = body_text(res);
        assert!(body.contains("Directory listing for /docs"));
        assert!(body.contains("href=\"/docs/a.txt\""));
    }

    #[tokio::test]
    async fn post_echoes_body() {
        let (_dir, server) = service();
        let res = server
            .handle(
                request("POST /anything HTTP/1.1\r\nHost: x\r\nContent-Length: 5\r\n\r\nhello"),
                peer(),
            )
            .await;
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.body_ref().as_ref(), b"Received: hello");
    }

    #[tokio::test]
    async fn unsupported_method_is_405() {
        let (_dir, server) = service();
        let res = server
            .handle(request("DELETE /hello.txt HTTP/1.1\r\nHost: x\r\n\r\n"), peer())
            .await;
        assert_eq!(res.status(), StatusCode::MethodNotAllowed);
    }
}
