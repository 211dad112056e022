//! Clipboard infrastructure.
//!
//! Sharing a configuration tries to put the share URL on the system
//! clipboard.  Copying is best effort: the caller logs a failure and carries
//! on, so nothing here needs to succeed for sharing to work.
//!
//! # How the command adapter works (for beginners)
//!
//! There is no portable clipboard API in the standard library.  Every desktop
//! ships a small program that copies its standard input to the clipboard
//! (`pbcopy` on macOS, `xclip`/`wl-copy` on Linux, `clip` on Windows).
//! [`CommandClipboard`] spawns the configured program with
//! [`tokio::process::Command`], writes the text into its stdin, closes the
//! pipe and waits for the exit status.
//!
//! # Testability
//!
//! The [`ClipboardWriter`] trait lets tests substitute
//! [`mock::RecordingClipboard`] (or a `mockall` mock in unit tests).

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

pub mod mock;

/// Error type for clipboard writes.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard command is configured.
    #[error("no clipboard command configured")]
    NotConfigured,

    /// The clipboard program could not be started.
    #[error("failed to start clipboard command {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing to or waiting for the clipboard program failed.
    #[error("I/O error talking to clipboard command {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The clipboard program exited unsuccessfully.
    #[error("clipboard command {program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    /// Injected failure from a test double.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Writes text to the system clipboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    /// Replaces the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard adapter that pipes text into an external program.
#[derive(Debug, Clone, Default)]
pub struct CommandClipboard {
    /// Program followed by its arguments.  Empty means "not configured".
    command: Vec<String>,
}

impl CommandClipboard {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ClipboardWriter for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or(ClipboardError::NotConfigured)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ClipboardError::Spawn {
                program: program.clone(),
                source,
            })?;

        let io_err = |source| ClipboardError::Io {
            program: program.clone(),
            source,
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(io_err)?;
            stdin.shutdown().await.map_err(io_err)?;
        }

        let status = child.wait().await.map_err(io_err)?;
        if !status.success() {
            return Err(ClipboardError::Failed {
                program: program.clone(),
                status,
            });
        }

        debug!("copied {} bytes to clipboard via {program}", text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_clipboard_returns_not_configured() {
        let clipboard = CommandClipboard::new(None);

        let result = clipboard.write_text("http://localhost:3000/").await;

        assert!(matches!(result, Err(ClipboardError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_missing_program_returns_spawn_error() {
        let clipboard = CommandClipboard::new(Some(vec![
            "carcfg-no-such-clipboard-program".to_string(),
        ]));

        let result = clipboard.write_text("x").await;

        assert!(matches!(result, Err(ClipboardError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command_returns_ok() {
        // Arrange – `cat` drains stdin and exits 0
        let clipboard = CommandClipboard::new(Some(vec!["cat".to_string()]));

        // Act
        let result = clipboard.write_text("http://localhost:3000/?config=abc").await;

        // Assert
        assert!(result.is_ok(), "unexpected error: {result:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_returns_failed() {
        let clipboard = CommandClipboard::new(Some(vec![
            "sh".to_string(),
            "-c".to_string(),
            "cat > /dev/null; exit 3".to_string(),
        ]));

        let result = clipboard.write_text("x").await;

        assert!(matches!(result, Err(ClipboardError::Failed { .. })));
    }
}
