use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use crate::error::DownloadStatusError;

/// Extension used when none can be derived from a URL.
pub const FALLBACK_EXTENSION: &str = "mp4";

/// Longest file name stem `safe_filename` will produce.
const MAX_STEM_CHARS: usize = 100;

const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Platform-specific "persist these bytes" capability.
///
/// The browser original materializes a transient object URL, clicks an
/// anchor, and revokes the URL 100 ms later; an implementation that hands out
/// transient handles must keep them alive until the consuming action is done.
#[async_trait]
pub trait SaveSink: Send + Sync {
    /// Persist a fully-materialized buffer under the suggested file name.
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<()>;

    /// Best-effort save straight from the source URL, used when the buffered
    /// path failed. Callers do not get to observe whether it worked.
    async fn save_from_url(&self, url: &str, filename: &str) -> Result<()>;
}

/// Sink writing into a fixed directory, created on demand.
pub struct FsSink {
    dir: PathBuf,
    client: reqwest::Client,
}

impl FsSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl SaveSink for FsSink {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.ok();
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    async fn save_from_url(&self, url: &str, filename: &str) -> Result<()> {
        let bytes = self.client.get(url).send().await?.bytes().await?;
        self.save(bytes.as_ref(), filename).await
    }
}

/// Fetch-and-save front end over a [`SaveSink`].
pub struct Downloader {
    client: reqwest::Client,
    sink: Arc<dyn SaveSink>,
}

impl Downloader {
    pub fn new(client: reqwest::Client, sink: Arc<dyn SaveSink>) -> Self {
        Self { client, sink }
    }

    /// Fetch `url` fully and save it as `filename`.
    ///
    /// When the buffered path fails for any reason this degrades to the
    /// sink's direct-URL path, which cannot report success or failure, so
    /// this never surfaces an error.
    pub async fn download_file(&self, url: &str, filename: &str) {
        if let Err(e) = self.fetch_and_save(url, filename).await {
            tracing::warn!("buffered download of {url} failed ({e}), trying direct save");
            let _ = self.sink.save_from_url(url, filename).await;
        }
    }

    async fn fetch_and_save(&self, url: &str, filename: &str) -> Result<()> {
        let bytes = self.client.get(url).send().await?.bytes().await?;
        self.sink.save(bytes.as_ref(), filename).await
    }

    /// Streaming download with per-chunk progress.
    ///
    /// `on_progress` receives a 0–100 percentage after every chunk, but only
    /// when the server sent a usable `content-length`; without one the
    /// download still completes, silently. Fails on a non-success status or
    /// a broken body stream.
    pub async fn download_with_progress<F>(&self, url: &str, filename: &str, on_progress: F) -> Result<()>
    where
        F: FnMut(f64),
    {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadStatusError(status.as_u16()).into());
        }

        let total = response.content_length();
        let body = collect_with_progress(response.bytes_stream(), total, on_progress).await?;
        self.sink.save(&body, filename).await
    }
}

/// Accumulate a chunked body, reporting progress against `total` when known.
async fn collect_with_progress<S, B, E, F>(
    mut stream: S,
    total: Option<u64>,
    mut on_progress: F,
) -> Result<Vec<u8>, E>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    F: FnMut(f64),
{
    let mut body = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut received = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        body.extend_from_slice(chunk.as_ref());
        received += chunk.as_ref().len() as u64;
        if let Some(total) = total.filter(|t| *t > 0) {
            on_progress(received as f64 / total as f64 * 100.0);
        }
    }
    Ok(body)
}

/// Extension from the path component of `url`, or from the raw string when it
/// is not an absolute URL. "mp4" when neither carries one.
pub fn file_extension(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };
    match path.rsplit_once('.') {
        Some((_, ext)) => ext.to_string(),
        None => FALLBACK_EXTENSION.to_string(),
    }
}

/// File-system-safe name from a media title: unsafe characters stripped,
/// whitespace runs collapsed to single underscores, stem capped at 100
/// characters, empty titles fall back to "video".
pub fn safe_filename(title: &str, extension: &str) -> String {
    let stripped: String = title.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect();

    let mut stem = String::with_capacity(stripped.len());
    let mut in_whitespace = false;
    for ch in stripped.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(ch);
            in_whitespace = false;
        }
    }

    let stem: String = stem.chars().take(MAX_STEM_CHARS).collect();
    let stem = if stem.is_empty() { "video".to_string() } else { stem };
    format!("{stem}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[test]
    fn extension_from_absolute_url_path() {
        assert_eq!(file_extension("https://x.com/a/b.mov"), "mov");
        assert_eq!(file_extension("https://x.com/a/b"), "mp4");
    }

    #[test]
    fn extension_from_bare_path() {
        assert_eq!(file_extension("clip.webm"), "webm");
        assert_eq!(file_extension("noext"), "mp4");
    }

    #[test]
    fn safe_filename_strips_and_underscores() {
        assert_eq!(safe_filename("a/b:c*d", "mp4"), "abcd.mp4");
        assert_eq!(safe_filename("my cool  video", "mov"), "my_cool_video.mov");
    }

    #[test]
    fn safe_filename_falls_back_to_video() {
        assert_eq!(safe_filename("", "mp4"), "video.mp4");
        assert_eq!(safe_filename("<>:\"", "mp4"), "video.mp4");
    }

    #[test]
    fn safe_filename_caps_the_stem() {
        let name = safe_filename(&"x".repeat(300), "mp4");
        assert_eq!(name.len(), 100 + ".mp4".len());
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_reaches_100() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
            vec![Ok(vec![0u8; 25]), Ok(vec![0u8; 25]), Ok(vec![0u8; 50])];
        let mut seen = Vec::new();
        let body = collect_with_progress(stream::iter(chunks), Some(100), |pct| seen.push(pct))
            .await
            .unwrap();

        assert_eq!(body.len(), 100);
        assert_eq!(seen, vec![25.0, 50.0, 100.0]);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn no_content_length_means_no_callbacks() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![Ok(vec![1, 2]), Ok(vec![3])];
        let mut calls = 0;
        let body = collect_with_progress(stream::iter(chunks), None, |_| calls += 1)
            .await
            .unwrap();

        assert_eq!(body, vec![1, 2, 3]);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn chunk_error_propagates() {
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
            Ok(vec![1]),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let result = collect_with_progress(stream::iter(chunks), Some(10), |_| {}).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fs_sink_writes_under_suggested_name() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FsSink::new(tmp.path().join("nested"));
        sink.save(b"bytes", "clip.mp4").await.unwrap();

        let written = tokio::fs::read(tmp.path().join("nested/clip.mp4")).await.unwrap();
        assert_eq!(written, b"bytes");
    }

    #[tokio::test]
    async fn progress_download_surfaces_request_failure() {
        // Nothing listens on port 1; the request itself fails and must
        // propagate, unlike download_file's swallow-and-fall-back.
        let sink = Arc::new(FsSink::new(std::env::temp_dir()));
        let downloader = Downloader::new(reqwest::Client::new(), sink);
        let result = downloader
            .download_with_progress("http://127.0.0.1:1/clip.mp4", "clip.mp4", |_| {})
            .await;
        assert!(result.is_err());
    }
}
