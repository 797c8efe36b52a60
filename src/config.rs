use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Session configuration. All fields are optional in the TOML file;
/// environment variables override whatever the file said.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend API, up to and including the `/api` prefix.
    pub api_base: String,
    /// Where downloads land. Defaults to the platform download folder.
    pub download_dir: Option<PathBuf>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8080/api".to_string(),
            download_dir: None,
            user_agent: concat!("shareparse/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from a TOML file if one was given, then apply env overrides
    /// (SHAREPARSE_API_BASE, SHAREPARSE_DOWNLOAD_DIR, SHAREPARSE_TIMEOUT_SECS).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config {}", p.display()))?;
                toml::from_str(&text).with_context(|| format!("parsing config {}", p.display()))?
            }
            None => Self::default(),
        };

        if let Ok(base) = std::env::var("SHAREPARSE_API_BASE") {
            if !base.trim().is_empty() {
                cfg.api_base = base;
            }
        }
        if let Ok(dir) = std::env::var("SHAREPARSE_DOWNLOAD_DIR") {
            if !dir.trim().is_empty() {
                cfg.download_dir = Some(PathBuf::from(dir));
            }
        }
        if let Some(secs) = std::env::var("SHAREPARSE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            cfg.request_timeout_secs = secs;
        }

        Ok(cfg)
    }

    /// Directory downloads land in: the configured one, else the user's
    /// download folder, else the current directory.
    pub fn download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|d| d.download_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
