//! The request-routing core: an ordered chain of case handlers.
//!
//! Each [`CaseKind`] pairs a predicate over the resolved filesystem path
//! (`test`) with an action that produces the response payload (`act`). The
//! [`CaseChain`] tries its cases in order and the first match wins; order is
//! part of the contract, not an implementation detail.
//!
//! `test` only inspects filesystem metadata and is idempotent. All real I/O
//! — file reads, directory reads, process spawning — happens in `act`.

use std::io;
use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::mime;
use crate::pages;
use crate::resolve::ResolvedContext;

pub mod script;

/// Everything that can go wrong while serving a resolved path.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The path escapes the document root. Rendered with the same generic
    /// message and status as a missing file so existence is not leaked.
    #[error("not found")]
    Traversal,

    /// The requested path does not exist.
    #[error("'{path}' not found")]
    NotFound { path: String },

    /// The fallback case fired: the path exists but is neither a regular
    /// file nor a directory.
    #[error("unknown object '{path}'")]
    Unrecognized { path: String },

    /// The resource exists but could not be read.
    #[error("'{path}' cannot be read: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Script execution failed, timed out, or exited non-zero.
    #[error("script error: {detail}")]
    Execution { detail: String },

    /// An uncaught per-request fault.
    #[error("internal server error: {detail}")]
    Internal { detail: String },
}

impl ServeError {
    /// The HTTP status code this error renders with: 404 for resource and
    /// path errors, unreadable resources included, 500 only for execution
    /// and internal faults.
    pub fn status(&self) -> crate::http::StatusCode {
        use crate::http::StatusCode;
        match self {
            Self::Traversal
            | Self::NotFound { .. }
            | Self::Unrecognized { .. }
            | Self::Io { .. } => StatusCode::NotFound,
            Self::Execution { .. } | Self::Internal { .. } => StatusCode::InternalServerError,
        }
    }
}

/// Response payload produced by a matched case.
#[derive(Debug, Clone)]
pub struct Body {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

impl Body {
    fn new(bytes: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }
}

/// The result of executing a matched case: content to serve or an error to
/// report.
pub type Outcome = Result<Body, ServeError>;

/// The closed set of case handlers, in their default chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    /// The path does not exist.
    NotFound,
    /// The path is a regular file.
    PlainFile,
    /// The path is a directory containing `index.html`.
    DirectoryWithIndex,
    /// The path is a directory without `index.html`.
    DirectoryListing,
    /// The path is a regular file with a script extension.
    ExecutableScript,
    /// Always matches; the path is some other filesystem object.
    Fallback,
}

impl CaseKind {
    /// Returns `true` if this case claims the resolved path.
    ///
    /// Only inspects metadata; repeated calls with the same context yield
    /// the same answer as long as the filesystem does not change underneath.
    pub async fn test(self, ctx: &ResolvedContext) -> bool {
        let path = ctx.full_path();
        match self {
            Self::NotFound => !exists(path).await,
            Self::PlainFile => is_file(path).await,
            Self::DirectoryWithIndex => {
                is_dir(path).await && is_file(&index_path(ctx)).await
            }
            Self::DirectoryListing => {
                is_dir(path).await && !is_file(&index_path(ctx)).await
            }
            Self::ExecutableScript => script::is_script(path) && is_file(path).await,
            Self::Fallback => true,
        }
    }

    /// Executes this case's action against the resolved path.
    pub async fn act(self, ctx: &ResolvedContext) -> Outcome {
        match self {
            Self::NotFound => Err(ServeError::NotFound {
                path: ctx.raw_path().to_owned(),
            }),
            Self::PlainFile => read_file(ctx.raw_path(), ctx.full_path()).await,
            Self::DirectoryWithIndex => read_file(ctx.raw_path(), &index_path(ctx)).await,
            Self::DirectoryListing => list_directory(ctx).await,
            Self::ExecutableScript => script::run(ctx.full_path()).await,
            Self::Fallback => Err(ServeError::Unrecognized {
                path: ctx.raw_path().to_owned(),
            }),
        }
    }
}

/// The contractual default order.
pub const DEFAULT_ORDER: [CaseKind; 6] = [
    CaseKind::NotFound,
    CaseKind::PlainFile,
    CaseKind::DirectoryWithIndex,
    CaseKind::DirectoryListing,
    CaseKind::ExecutableScript,
    CaseKind::Fallback,
];

/// An immutable, ordered list of case handlers.
///
/// Constructed once at startup and shared read-only across requests.
///
/// # Examples
///
/// ```
/// use webroot::cases::{CaseChain, CaseKind};
///
/// let chain = CaseChain::new();
/// assert_eq!(chain.cases().first(), Some(&CaseKind::NotFound));
/// ```
#[derive(Debug, Clone)]
pub struct CaseChain {
    cases: Vec<CaseKind>,
}

impl CaseChain {
    /// Creates a chain with the default case order.
    pub fn new() -> Self {
        Self::with_order(DEFAULT_ORDER)
    }

    /// Creates a chain with an explicit case order.
    ///
    /// The order is the contract: a context matching two cases always gets
    /// the earlier case's action. Omitting [`CaseKind::Fallback`] means a
    /// context no case claims resolves to [`ServeError::Internal`].
    pub fn with_order(cases: impl Into<Vec<CaseKind>>) -> Self {
        Self {
            cases: cases.into(),
        }
    }

    /// Returns the cases in chain order.
    pub fn cases(&self) -> &[CaseKind] {
        &self.cases
    }

    /// Runs the chain: the first case whose `test` returns `true` executes
    /// its `act`, and that result is final.
    pub async fn resolve(&self, ctx: &ResolvedContext) -> Outcome {
        for case in &self.cases {
            if case.test(ctx).await {
                debug!(path = %ctx.raw_path(), case = ?case, "case matched");
                return case.act(ctx).await;
            }
        }
        Err(ServeError::Internal {
            detail: format!("no case matched '{}'", ctx.raw_path()),
        })
    }
}

impl Default for CaseChain {
    fn default() -> Self {
        Self::new()
    }
}

fn index_path(ctx: &ResolvedContext) -> std::path::PathBuf {
    ctx.full_path().join("index.html")
}

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Reads a whole file into memory with its extension-derived content type.
async fn read_file(raw_path: &str, path: &Path) -> Outcome {
    let bytes = tokio::fs::read(path).await.map_err(|source| ServeError::Io {
        path: raw_path.to_owned(),
        source,
    })?;
    Ok(Body::new(bytes, mime::content_type(path)))
}

/// Builds an HTML listing of the directory's visible entries, sorted
/// lexicographically. Entries whose name starts with `.` are skipped.
async fn list_directory(ctx: &ResolvedContext) -> Outcome {
    let map_err = |source: io::Error| ServeError::Io {
        path: ctx.raw_path().to_owned(),
        source,
    };

    let mut entries = Vec::new();
    let mut reader = tokio::fs::read_dir(ctx.full_path()).await.map_err(map_err)?;
    while let Some(entry) = reader.next_entry().await.map_err(map_err)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            entries.push(name);
        }
    }
    entries.sort();

    let page = pages::listing_page(ctx.raw_path(), &entries);
    Ok(Body::new(page, "text/html"))
}
