//! Model collaborator backed by a local CLI tool.
//!
//! The model command is any shell command that reads a prompt on stdin and
//! writes its completion to stdout (e.g. a `gemini` or `llm` wrapper). The
//! library never learns which; it only sees the [`ModelClient`] trait.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use matchday::{ExtractError, ModelClient};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// How long one completion may take before the message degrades.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

pub struct CliModelClient {
    command: String,
    timeout: Duration,
}

impl CliModelClient {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: COMPLETION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ModelClient for CliModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, ExtractError> {
        debug!(command = %self.command, prompt_len = prompt.len(), "invoking model command");

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out model must not linger as an orphan.
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ExtractError::ModelUnavailable(format!("spawn failed: {err}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|err| ExtractError::ModelUnavailable(format!("stdin write: {err}")))?;
            // Drop closes the pipe so the tool sees EOF.
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                ExtractError::ModelUnavailable(format!("timed out after {:?}", self.timeout))
            })?
            .map_err(|err| ExtractError::ModelUnavailable(format!("wait failed: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::ModelUnavailable(format!(
                "exit {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echoing_command_completes() {
        let client = CliModelClient::new("cat");
        let out = client.complete("{\"events\": []}").await.unwrap();
        assert_eq!(out, "{\"events\": []}");
    }

    #[tokio::test]
    async fn test_failing_command_is_unavailable() {
        let client = CliModelClient::new("false");
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, ExtractError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_hung_command_times_out() {
        let client = CliModelClient::new("sleep 30").with_timeout(Duration::from_millis(100));
        let err = client.complete("prompt").await.unwrap_err();
        match err {
            ExtractError::ModelUnavailable(reason) => assert!(reason.contains("timed out")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timed_out_command_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let client = CliModelClient::new(format!("sleep 1 && touch {}", marker.display()))
            .with_timeout(Duration::from_millis(100));

        client.complete("prompt").await.unwrap_err();

        // Were the shell still alive it would create the marker after its
        // sleep; the kill on timeout prevents that.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
