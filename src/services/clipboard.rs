use crate::utils::ClipboardError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Write-only access to a clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Host clipboard, written through the platform's clipboard helper program
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: Vec<(&'static str, Vec<&'static str>)>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        let candidates = if cfg!(target_os = "macos") {
            vec![("pbcopy", vec![])]
        } else if cfg!(target_os = "windows") {
            vec![("clip", vec![])]
        } else {
            vec![
                ("wl-copy", vec![]),
                ("xclip", vec!["-selection", "clipboard"]),
                ("xsel", vec!["--clipboard", "--input"]),
            ]
        };
        Self { candidates }
    }
}

impl SystemClipboard {
    async fn write_with(
        program: &str,
        args: &[&str],
        text: &str,
    ) -> Result<(), ClipboardError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::Unavailable(format!("{}: {}", program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| ClipboardError::WriteFailed(format!("{}: {}", program, e)))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ClipboardError::WriteFailed(format!("{}: {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::WriteFailed(format!("{} exited with {}", program, status)))
        }
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = ClipboardError::Unavailable("no clipboard helper configured".to_string());

        for (program, args) in &self.candidates {
            match Self::write_with(program, args, text).await {
                Ok(()) => return Ok(()),
                Err(ClipboardError::Unavailable(msg)) => {
                    log::debug!("📋 {} not usable: {}", program, msg);
                    last_error = ClipboardError::Unavailable(msg);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error)
    }
}
