use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default display duration for a notification.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Presentation category of a notification. Drives styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// One transient user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
}

/// Ordered queue of transient messages; insertion order is display order.
///
/// Every entry expires on its own timer. Expiry and explicit removal are both
/// idempotent, so it does not matter which one fires first. No upper bound is
/// enforced on the queue length.
pub struct NotificationQueue {
    entries: Arc<Mutex<Vec<Notification>>>,
    next_id: AtomicU64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Append a notification with the default 3 s duration. Returns its id.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> u64 {
        self.show_for(message, severity, DEFAULT_DURATION)
    }

    /// Append a notification and schedule its removal after `duration`.
    ///
    /// Must be called from within a tokio runtime; the expiry timer is a
    /// spawned task.
    pub fn show_for(&self, message: impl Into<String>, severity: Severity, duration: Duration) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.lock().unwrap().push(Notification {
            id,
            message: message.into(),
            severity,
            duration,
        });

        let entries = Arc::clone(&self.entries);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            remove_entry(&entries, id);
        });
        id
    }

    /// Remove by id. No-op when the entry is already gone or was never issued.
    pub fn remove(&self, id: u64) {
        remove_entry(&self.entries, id);
    }

    /// Current contents in display order.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_entry(entries: &Mutex<Vec<Notification>>, id: u64) {
    let mut entries = entries.lock().unwrap();
    if let Some(pos) = entries.iter().position(|n| n.id == id) {
        entries.remove(pos);
    }
}
