//! Static extension → content-type table.

use std::path::Path;

/// Fallback content type for unknown extensions.
pub const DEFAULT: &str = "text/plain";

/// The extensions this server recognizes. Anything else is served as
/// [`DEFAULT`].
const TABLE: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

/// Returns the content type for a path, derived solely from its extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// assert_eq!(webroot::mime::content_type(Path::new("a/index.html")), "text/html");
/// assert_eq!(webroot::mime::content_type(Path::new("notes.txt")), "text/plain");
/// ```
pub fn content_type(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext,
        None => return DEFAULT,
    };
    TABLE
        .iter()
        .find(|(e, _)| ext.eq_ignore_ascii_case(e))
        .map(|(_, ty)| *ty)
        .unwrap_or(DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type(Path::new("style.css")), "text/css");
        assert_eq!(content_type(Path::new("app.js")), "application/javascript");
        assert_eq!(content_type(Path::new("logo.png")), "image/png");
        assert_eq!(content_type(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(content_type(Path::new("photo.jpeg")), "image/jpeg");
    }

    #[test]
    fn case_insensitive_extension() {
        assert_eq!(content_type(Path::new("INDEX.HTML")), "text/html");
    }

    #[test]
    fn unknown_falls_back_to_plain() {
        assert_eq!(content_type(Path::new("README.md")), "text/plain");
        assert_eq!(content_type(Path::new("Makefile")), "text/plain");
    }
}
