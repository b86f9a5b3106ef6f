//! Configuration types and loading
//!
//! Config path precedence: CLI `--config` > CONFIG_PATH env var > default
//! file name. The OAuth client secret resolves from the GOOGLE_CLIENT_SECRET
//! env var, then `client_secret_file`, then an inline TOML value (local
//! development only — keep real secrets out of config files).

use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub oauth: OauthConfig,
    pub session: SessionConfig,
}

/// Listener and environment settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Local development flag: request origins are derived with http://
    /// instead of https://.
    #[serde(default)]
    pub local: bool,
    /// Internal listener for /health and /metrics. Not exposed publicly.
    #[serde(default = "default_admin_addr")]
    pub admin_addr: SocketAddr,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// OAuth client credentials
#[derive(Debug, Deserialize)]
pub struct OauthConfig {
    pub client_id: String,
    /// Inline secret for local development; production deployments use
    /// GOOGLE_CLIENT_SECRET or client_secret_file.
    #[serde(default)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to the
    /// GOOGLE_CLIENT_SECRET env var)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
}

/// Session persistence settings
#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    pub redis_url: String,
}

fn default_admin_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9090))
}

fn default_max_connections() -> usize {
    1000
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment
    /// variables.
    ///
    /// Client secret resolution order:
    /// 1. GOOGLE_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    /// 3. inline client_secret value from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.oauth.client_id.trim().is_empty() {
            return Err(common::Error::Config(
                "oauth.client_id must not be empty".into(),
            ));
        }

        if !config.session.redis_url.starts_with("redis://")
            && !config.session.redis_url.starts_with("rediss://")
        {
            return Err(common::Error::Config(format!(
                "session.redis_url must start with redis:// or rediss://, got: {}",
                config.session.redis_url
            )));
        }

        if config.server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        // Resolve client secret: env var takes precedence over file, file
        // over inline value
        if let Ok(secret) = std::env::var("GOOGLE_CLIENT_SECRET") {
            config.oauth.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.oauth.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.oauth.client_secret = Some(Secret::new(secret));
            }
        }

        if config.oauth.client_secret.is_none() {
            return Err(common::Error::Config(
                "oauth client secret missing — set GOOGLE_CLIENT_SECRET, \
                 client_secret_file, or client_secret"
                    .into(),
            ));
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("drive-gate.toml")
    }
}
