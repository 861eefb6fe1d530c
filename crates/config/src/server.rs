use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::{from_path, ConfigResult};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// `ServerConfig` describes where the server listens and where it finds
/// its static assets and page templates. Every field has a default so a
/// partial (or empty) config file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub http_port: u16,
    pub public_directory: PathBuf,
    pub templates_directory: PathBuf,

    /// Values substituted into `{{ name }}` placeholders of every page.
    pub template_globals: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::from(DEFAULT_ADDRESS),
            http_port: DEFAULT_HTTP_PORT,
            public_directory: PathBuf::from("public"),
            templates_directory: PathBuf::from("templates"),
            template_globals: BTreeMap::new(),
        }
    }
}

impl core::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

impl ServerConfig {
    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// See [`crate::from_path`].
    pub fn load<V: Into<PathBuf>>(target: V) -> ConfigResult<Self> {
        from_path(target)
    }

    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.address, self.http_port)
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }
}
