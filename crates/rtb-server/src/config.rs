use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `leaderboard.txt` and `reserved_codes.txt`.
    pub data_dir: PathBuf,
    /// Built frontend to serve for non-API paths; skipped if absent on disk.
    pub static_dir: Option<PathBuf>,
    pub allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            static_dir: Some(PathBuf::from("frontend/dist")),
            allow_any_origin: true,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply the `PORT` environment variable, if set.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_port_override(std::env::var("PORT").ok().as_deref())
    }

    /// Replace the bind port with `port`, keeping the bind address.
    pub fn apply_port_override(&mut self, port: Option<&str>) -> ServerResult<()> {
        if let Some(port) = port {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid PORT value: {port:?}")))?;
            self.bind_addr.set_port(port);
        }
        Ok(())
    }
}
