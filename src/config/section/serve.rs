//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5280                 # HTTP port number
//! path = "/comments/feed"     # URL path answering feed requests
//! workers = 4                 # Request worker threads
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

/// Feed server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// URL path of the feed endpoint.
    pub path: String,

    /// Worker threads handling requests.
    pub workers: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5280,
            path: "/comments/feed".into(),
            workers: 4,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.path.starts_with('/') {
            diag.error_with_hint(
                "serve.path",
                format!("`{}` is not an absolute URL path", self.path),
                "start the path with '/', e.g.: \"/comments/feed\"",
            );
        }
        if self.workers == 0 {
            diag.error("serve.workers", "at least one worker is required");
        }
    }
}
