//! Server configuration: bind address and document root.
//!
//! The server exposes no CLI flags; configuration comes from environment
//! variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use serde::Deserialize;

/// Environment variable overriding the bind address.
pub const ADDR_VAR: &str = "WEBROOT_ADDR";

/// Environment variable overriding the document root.
pub const ROOT_VAR: &str = "WEBROOT_ROOT";

/// Startup configuration.
///
/// # Examples
///
/// ```
/// use webroot::config::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.addr, "127.0.0.1:8000");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP address to bind, e.g. `127.0.0.1:8000`.
    pub addr: String,
    /// Directory served as the filesystem root.
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_owned(),
            root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// Builds a configuration from the defaults, overridden by the
    /// `WEBROOT_ADDR` and `WEBROOT_ROOT` environment variables when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = env::var(ADDR_VAR) {
            config.addr = addr;
        }
        if let Ok(root) = env::var(ROOT_VAR) {
            config.root = PathBuf::from(root);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:8000");
        assert_eq!(config.root, PathBuf::from("."));
    }
}
