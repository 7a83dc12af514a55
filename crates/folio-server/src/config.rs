//! Server configuration for `Folio`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `FOLIO_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Which set of on-disk locations to use when none are given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// `data/` and `users.yml`.
    Production,
    /// `test/data/` and `test/users.yml`, isolated from real documents.
    Test,
}

impl Environment {
    fn from_var(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("test") => Self::Test,
            _ => Self::Production,
        }
    }

    /// Default document store root.
    #[must_use]
    pub fn data_dir(self) -> PathBuf {
        match self {
            Self::Production => PathBuf::from("data"),
            Self::Test => PathBuf::from("test").join("data"),
        }
    }

    /// Default credential file.
    #[must_use]
    pub fn users_file(self) -> PathBuf {
        match self {
            Self::Production => PathBuf::from("users.yml"),
            Self::Test => PathBuf::from("test").join("users.yml"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Production or test locations.
    pub environment: Environment,
    /// Directory holding the documents.
    pub data_dir: PathBuf,
    /// YAML file mapping usernames to bcrypt hashes.
    pub users_file: PathBuf,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Idle time after which a session is forgotten.
    pub session_ttl: Duration,
    /// Interval between expired-session sweeps.
    pub session_sweep_interval: Duration,
    /// Whether the session cookie carries the `Secure` attribute.
    pub secure_cookie: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on, binds to `0.0.0.0`
    /// - `FOLIO_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:4567`)
    /// - `FOLIO_ENV`: `test` selects `test/data` and `test/users.yml` (default: production)
    /// - `FOLIO_DATA_DIR`: document directory (overrides `FOLIO_ENV`)
    /// - `FOLIO_USERS_FILE`: credential file (overrides `FOLIO_ENV`)
    /// - `FOLIO_LOG_LEVEL`: log filter (default: `info`)
    /// - `FOLIO_SESSION_TTL`: session idle timeout in seconds (default: `86400`)
    /// - `FOLIO_SESSION_SWEEP_INTERVAL`: seconds between session sweeps (default: `300`)
    /// - `FOLIO_SECURE_COOKIE`: mark the session cookie `Secure` (default: `false`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Priority: FOLIO_BIND_ADDR > PORT > default 127.0.0.1:4567
        let bind_addr = if let Some(addr) = lookup("FOLIO_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 4567)))
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or(4567);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 4567))
        };

        let environment = Environment::from_var(lookup("FOLIO_ENV").as_deref());

        let data_dir = lookup("FOLIO_DATA_DIR")
            .map_or_else(|| environment.data_dir(), PathBuf::from);

        let users_file = lookup("FOLIO_USERS_FILE")
            .map_or_else(|| environment.users_file(), PathBuf::from);

        let log_level = lookup("FOLIO_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let session_ttl = Duration::from_secs(
            lookup("FOLIO_SESSION_TTL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
        );

        let session_sweep_interval = Duration::from_secs(
            lookup("FOLIO_SESSION_SWEEP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(300),
        );

        let secure_cookie = lookup("FOLIO_SECURE_COOKIE")
            .is_some_and(|v| v == "true" || v == "1");

        Self {
            bind_addr,
            environment,
            data_dir,
            users_file,
            log_level,
            session_ttl,
            session_sweep_interval,
            secure_cookie,
        }
    }
}
