use std::io::{IsTerminal, Write, stdout};
use std::process::Stdio;

use async_trait::async_trait;
use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::ShareError;

/// Platform-level sharing facility.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    fn is_available(&self) -> bool;

    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

/// Shared clipboard-like destination used when sharing is unavailable.
#[async_trait]
pub trait ClipboardTarget: Send + Sync {
    fn is_available(&self) -> bool;

    async fn copy(&self, text: &str) -> Result<(), ShareError>;
}

/// Runs a configured command with the summary on stdin and the title in
/// `WSDIAG_SHARE_TITLE`.
pub struct CommandShare {
    program: String,
    args: Vec<String>,
}

impl CommandShare {
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(CommandShare {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl ShareTarget for CommandShare {
    fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("WSDIAG_SHARE_TITLE", title)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ShareError::Share(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| ShareError::Share(e.to_string()))?;
            stdin
                .shutdown()
                .await
                .map_err(|e| ShareError::Share(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ShareError::Share(e.to_string()))?;
        debug!(program = %self.program, %status, "share command finished");
        if status.success() {
            Ok(())
        } else {
            Err(ShareError::Share(format!("{} exited with {status}", self.program)))
        }
    }
}

/// Copies through the terminal with an OSC 52 escape sequence.
pub struct Osc52Clipboard;

#[async_trait]
impl ClipboardTarget for Osc52Clipboard {
    fn is_available(&self) -> bool {
        stdout().is_terminal()
    }

    async fn copy(&self, text: &str) -> Result<(), ShareError> {
        let mut out = stdout();
        execute!(out, CopyToClipboard::to_clipboard_from(text))
            .and_then(|()| out.flush())
            .map_err(|e| ShareError::Clipboard(e.to_string()))
    }
}

/// Stands in for a share facility or clipboard that is not configured.
pub struct Unavailable;

#[async_trait]
impl ShareTarget for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _title: &str, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}

#[async_trait]
impl ClipboardTarget for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    async fn copy(&self, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}
