use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_STATIC_DIR: &str = "./public";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// File served for any non-API path that does not resolve to a static file.
pub const ENTRY_DOCUMENT: &str = "index.html";

/// Process-wide settings, read once at startup and never mutated afterwards.
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` when `OPENAI_API_KEY` is unset or empty.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub default_model: String,
    pub static_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable              | Default                     |
    /// |-----------------------|-----------------------------|
    /// | `HOST`                | `0.0.0.0`                   |
    /// | `PORT`                | `3000`                      |
    /// | `OPENAI_API_KEY`      | none                        |
    /// | `OPENAI_BASE_URL`     | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`        | `gpt-4o-mini`               |
    /// | `OPENAI_TIMEOUT_SECS` | `600`                       |
    /// | `STATIC_DIR`          | `./public`                  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values behave as if the variable was never set
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("Invalid PORT {:?}, falling back to {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("OPENAI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "Invalid OPENAI_TIMEOUT_SECS {:?}, falling back to {}",
                    raw, DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            api_key: get("OPENAI_API_KEY"),
            api_base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            default_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn entry_document(&self) -> PathBuf {
        self.static_dir.join(ENTRY_DOCUMENT)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("default_model", &self.default_model)
            .field("static_dir", &self.static_dir)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
