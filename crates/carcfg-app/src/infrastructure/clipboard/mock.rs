//! Recording clipboard for tests and headless runs.
//!
//! Keeps every written text in memory instead of touching the system
//! clipboard.  Can be switched into a failing mode to exercise the
//! "copy failed, share still succeeds" path.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;

use super::{ClipboardError, ClipboardWriter};

/// A [`ClipboardWriter`] that records writes.
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    written: Arc<Mutex<Vec<String>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Every successfully written text, oldest first.
    pub fn written(&self) -> Vec<String> {
        self.written.lock().expect("lock poisoned").clone()
    }

    /// The current clipboard contents.
    pub fn contents(&self) -> Option<String> {
        self.written.lock().expect("lock poisoned").last().cloned()
    }
}

#[async_trait]
impl ClipboardWriter for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(ClipboardError::Unavailable("injected failure".to_string()));
        }
        self.written.lock().expect("lock poisoned").push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_clipboard_keeps_last_write() {
        // Arrange
        let clipboard = RecordingClipboard::new();

        // Act
        clipboard.write_text("first").await.expect("write");
        clipboard.write_text("second").await.expect("write");

        // Assert
        assert_eq!(clipboard.written(), vec!["first", "second"]);
        assert_eq!(clipboard.contents().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_failing_mode_rejects_writes() {
        let clipboard = RecordingClipboard::new();
        clipboard.set_failing(true);

        let result = clipboard.write_text("x").await;

        assert!(result.is_err());
        assert_eq!(clipboard.contents(), None);
    }
}
