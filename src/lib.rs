//! Client-side session layer for a video share-link parser: a parse store
//! that resolves share links through the backend API, a download utility
//! with progress reporting, a theme registry, and a notification queue.
//!
//! The stores are headless; any front end (CLI, desktop shell, bridge) can
//! read their snapshots and drive their operations.

pub mod config;
pub mod download;
pub mod error;
pub mod mapping;
pub mod notify;
pub mod parse;
pub mod theme;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::download::{file_extension, safe_filename, Downloader, FsSink, SaveSink};
    pub use crate::error::{DownloadStatusError, InvalidThemeError};
    pub use crate::notify::{Notification, NotificationQueue, Severity};
    pub use crate::parse::{ParseState, ParseStore};
    pub use crate::theme::{ThemeInfo, ThemeName, ThemeRegistry};
    pub use crate::types::{Author, ImgInfo, MediaInfo, VideoParseInfo};
}

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::download::{Downloader, FsSink, SaveSink};
use crate::notify::NotificationQueue;
use crate::parse::ParseStore;
use crate::theme::ThemeRegistry;

/// Per-session entry point. Owns one instance of every store; construct it
/// once per application session and hand references to whatever front end
/// drives it.
pub struct Shareparse {
    pub parser: ParseStore,
    pub downloads: Downloader,
    pub themes: ThemeRegistry,
    pub notifications: NotificationQueue,
}

impl Shareparse {
    /// Build the shared HTTP client and the stores from a config. Downloads
    /// go through a filesystem sink at the configured directory.
    pub fn new(config: &Config) -> Result<Self> {
        let sink = Arc::new(FsSink::new(config.download_dir()));
        Self::with_sink(config, sink)
    }

    /// Same session wired to a custom save sink (other platforms, tests).
    pub fn with_sink(config: &Config, sink: Arc<dyn SaveSink>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            parser: ParseStore::new(client.clone(), &config.api_base),
            downloads: Downloader::new(client, sink),
            themes: ThemeRegistry::new(),
            notifications: NotificationQueue::new(),
        })
    }
}
