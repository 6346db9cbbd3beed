//! # webroot
//!
//! A small async HTTP file server written in Rust.
//!
//! Incoming request paths are resolved against a document root and handed to
//! an ordered chain of case handlers: the first case whose predicate matches
//! the resolved path produces the response — a file body, a directory
//! listing, script output, or an error page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use webroot::config::ServerConfig;
//! use webroot::server::Server;
//! use webroot::service::FileServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env();
//!     let service = FileServer::new(&config.root)?;
//!     let server = Server::bind(&config.addr).await?;
//!     println!("Serving {} on http://{}", config.root.display(), server.local_addr());
//!     server.run(move |req, peer| {
//!         let service = service.clone();
//!         async move { service.handle(req, peer).await }
//!     }).await?;
//!     Ok(())
//! }
//! ```

pub mod cases;
pub mod config;
pub mod http;
pub mod mime;
pub mod pages;
pub mod resolve;
pub mod server;
pub mod service;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use server::{Server, ServerError};
pub use service::FileServer;
