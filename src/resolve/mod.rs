//! Path resolution — maps request paths to filesystem paths jailed inside a
//! document root.
//!
//! Resolution happens in two passes. A lexical pass normalizes `.` and `..`
//! components; a `..` that would climb above the root is rejected outright,
//! which covers paths that do not exist yet. When the target does exist, a
//! second pass canonicalizes it and re-checks containment against the
//! canonicalized root, which closes the symlink escape hole. The containment
//! check always runs on canonical paths, never on the raw concatenation.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errors produced while resolving a request path.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The path escapes the document root. A security fault, not a 404 in
    /// disguise — callers must not leak whether the target exists.
    #[error("path escapes the document root")]
    Traversal,

    /// The target exists but could not be canonicalized.
    #[error("cannot canonicalize {path}: {source}")]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A request path resolved to a filesystem location inside the root.
///
/// Invariant: `full_path` is the root itself or a descendant of it. The
/// target may or may not exist; the case chain decides what to do with it.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    raw_path: String,
    full_path: PathBuf,
    root: PathBuf,
}

impl ResolvedContext {
    /// The request path as received, e.g. `/docs/readme.txt`.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    /// The canonical absolute filesystem path for the request.
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// The document root this context is jailed to.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Resolves request paths against a canonicalized document root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver for `root`. The root is canonicalized once here so
    /// every later containment check compares canonical to canonical.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if `root` does not exist or cannot
    /// be canonicalized.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::fs::canonicalize(root)?;
        Ok(Self { root })
    }

    /// Returns the canonicalized document root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a request path (starting with `/`) to a [`ResolvedContext`].
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Traversal`] if the path escapes the root, either
    ///   lexically (`..`) or through a symlink.
    /// - [`ResolveError::Canonicalize`] if the target exists but cannot be
    ///   canonicalized.
    pub async fn resolve(&self, raw_path: &str) -> Result<ResolvedContext, ResolveError> {
        let joined = self.root.join(normalize(raw_path)?);

        let full_path = match tokio::fs::canonicalize(&joined).await {
            Ok(canonical) => {
                if !canonical.starts_with(&self.root) {
                    return Err(ResolveError::Traversal);
                }
                canonical
            }
            // Missing targets stay on the lexically-normalized path so the
            // NotFound case can claim them.
            Err(e) if e.kind() == io::ErrorKind::NotFound => joined,
            Err(source) => {
                return Err(ResolveError::Canonicalize {
                    path: joined,
                    source,
                });
            }
        };

        Ok(ResolvedContext {
            raw_path: raw_path.to_owned(),
            full_path,
            root: self.root.clone(),
        })
    }
}

/// Lexically normalizes a request path into a relative path below the root.
///
/// `.` components are dropped and `..` pops the previous component; popping
/// past the top is a traversal attempt.
fn normalize(raw_path: &str) -> Result<PathBuf, ResolveError> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(raw_path).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Prefix(_) => return Err(ResolveError::Traversal),
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(ResolveError::Traversal);
                }
            }
            Component::Normal(part) => parts.push(part),
        }
    }
    Ok(parts.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, PathResolver) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt"), b"hi").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/inner.txt"), b"inner").unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();
        (dir, resolver)
    }

    #[tokio::test]
    async fn resolves_existing_file() {
        let (_dir, resolver) = fixture();
        let ctx = resolver.resolve("/hello.txt").await.unwrap();
        assert_eq!(ctx.raw_path(), "/hello.txt");
        assert!(ctx.full_path().starts_with(resolver.root()));
        assert!(ctx.full_path().ends_with("hello.txt"));
    }

    #[tokio::test]
    async fn resolves_missing_path_without_error() {
        let (_dir, resolver) = fixture();
        let ctx = resolver.resolve("/no/such/file.txt").await.unwrap();
        assert!(ctx.full_path().starts_with(resolver.root()));
    }

    #[tokio::test]
    async fn dot_and_dotdot_normalized_within_root() {
        let (_dir, resolver) = fixture();
        let ctx = resolver.resolve("/sub/./../hello.txt").await.unwrap();
        assert!(ctx.full_path().ends_with("hello.txt"));
    }

    #[tokio::test]
    async fn dotdot_escape_is_traversal() {
        let (_dir, resolver) = fixture();
        let err = resolver.resolve("/../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, ResolveError::Traversal));
    }

    #[tokio::test]
    async fn single_dotdot_at_root_is_traversal() {
        let (_dir, resolver) = fixture();
        let err = resolver.resolve("/..").await.unwrap_err();
        assert!(matches!(err, ResolveError::Traversal));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_escape_is_traversal() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), b"secret").unwrap();

        let (dir, resolver) = fixture();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("link.txt"),
        )
        .unwrap();

        let err = resolver.resolve("/link.txt").await.unwrap_err();
        assert!(matches!(err, ResolveError::Traversal));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_inside_root_is_allowed() {
        let (dir, resolver) = fixture();
        std::os::unix::fs::symlink(dir.path().join("hello.txt"), dir.path().join("alias.txt"))
            .unwrap();

        let ctx = resolver.resolve("/alias.txt").await.unwrap();
        assert!(ctx.full_path().ends_with("hello.txt"));
    }
}
