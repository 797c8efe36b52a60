use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::mapping::media_from_payload;
use crate::types::{ApiResponse, MediaInfo, VideoParseInfo};

/// Store error shown when the input box is empty.
pub const MSG_EMPTY_URL: &str = "请输入视频链接";
const MSG_PARSE_FAILED: &str = "解析失败";
const MSG_NO_DATA: &str = "解析失败，未获取到数据";
const MSG_NETWORK: &str = "解析失败，请检查网络连接或后端服务是否运行";

/// Mutable state behind the parse store; cheap to snapshot.
///
/// After a completed request exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Default)]
pub struct ParseState {
    pub input_url: String,
    pub loading: bool,
    pub result: Option<MediaInfo>,
    pub error: Option<String>,
}

impl ParseState {
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Owns the input URL and the outcome of the one outbound parse call.
pub struct ParseStore {
    client: Client,
    api_base: String,
    state: Arc<Mutex<ParseState>>,
    generation: AtomicU64,
}

impl ParseStore {
    pub fn new(client: Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            state: Arc::new(Mutex::new(ParseState::default())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn set_input_url(&self, url: impl Into<String>) {
        self.state.lock().unwrap().input_url = url.into();
    }

    /// Snapshot of the current store state.
    pub fn state(&self) -> ParseState {
        self.state.lock().unwrap().clone()
    }

    /// Resolve the stored input URL through the backend parse endpoint.
    ///
    /// Ends in exactly one of result or error, and the loading flag drops on
    /// every path. A call that has been superseded by a newer one applies
    /// nothing when it completes.
    pub async fn parse_url(&self) {
        let url = self.state.lock().unwrap().input_url.clone();
        if url.trim().is_empty() {
            // Keeps any prior result; no request goes out.
            self.state.lock().unwrap().error = Some(MSG_EMPTY_URL.to_string());
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().unwrap();
            state.loading = true;
            state.result = None;
            state.error = None;
        }

        let outcome = self.request(&url).await;
        self.apply_outcome(generation, outcome);
    }

    // Write a completed request back into the store, unless a newer call
    // has taken over in the meantime (the newer call owns the loading flag).
    fn apply_outcome(&self, generation: u64, outcome: Result<MediaInfo, String>) {
        let mut state = self.state.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        match outcome {
            Ok(info) => state.result = Some(info),
            Err(msg) => state.error = Some(msg),
        }
        state.loading = false;
    }

    /// Reset input URL, result, and error. No network interaction.
    pub fn clear_result(&self) {
        let mut state = self.state.lock().unwrap();
        state.input_url.clear();
        state.result = None;
        state.error = None;
    }

    // One GET against the share-url endpoint; every failure comes back as
    // the user-facing message string.
    async fn request(&self, url: &str) -> Result<MediaInfo, String> {
        let endpoint = format!("{}/video/share/url/parse", self.api_base);
        let response = match self.client.get(&endpoint).query(&[("url", url)]).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("parse request failed: {e}");
                return Err(MSG_NETWORK.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(format!("{MSG_PARSE_FAILED}，HTTP 状态 {}", status.as_u16()));
        }

        let envelope: ApiResponse<VideoParseInfo> = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("parse response unreadable: {e}");
                return Err(MSG_NETWORK.to_string());
            }
        };
        envelope_outcome(envelope)
    }
}

/// Map a decoded envelope to the final outcome of a parse call.
fn envelope_outcome(envelope: ApiResponse<VideoParseInfo>) -> Result<MediaInfo, String> {
    if envelope.code != 200 {
        return Err(if envelope.msg.is_empty() {
            MSG_PARSE_FAILED.to_string()
        } else {
            envelope.msg
        });
    }
    match envelope.data {
        Some(payload) => Ok(media_from_payload(payload)),
        None => Err(MSG_NO_DATA.to_string()),
    }
}
