//! Subprocess runner for the Ollama CLI.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::LlmConfig;

/// Errors that can occur while invoking the model runtime.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model invocation timed out after {0}s")]
    Timeout(u64),

    #[error("model runtime not found: {0}")]
    RuntimeNotFound(String),

    #[error("model invocation failed: {0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Boundary contract for text generation.
///
/// One prompt in, one reply out, bounded by the runner's timeout. Kept as
/// a trait so handlers and the analyzer can be exercised against a stub.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    /// Generate a reply for the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Check whether the model runtime looks usable.
    fn is_available(&self) -> bool;
}

/// Runs `ollama run <model>` with the prompt on stdin.
///
/// Each call spawns an independent process; the child is killed if it
/// outlives the configured timeout.
pub struct OllamaRunner {
    binary: String,
    model: String,
    timeout: Duration,
}

impl OllamaRunner {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Spawn a command, feed it `input` on stdin, and collect stdout.
    ///
    /// stdout and stderr are drained concurrently with the wait so a
    /// chatty child cannot deadlock on a full pipe. On timeout the child
    /// is killed rather than left running.
    async fn invoke(&self, program: &str, args: &[&str], input: &str) -> Result<String, LlmError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LlmError::RuntimeNotFound(program.to_string())
                } else {
                    LlmError::Io(e)
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits without reading stdin closes the pipe;
            // its failure is reported through the exit status instead
            match stdin.write_all(input.as_bytes()).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
            // Dropping stdin closes the pipe so the child sees EOF
        }

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| LlmError::Failed("child stdout was not captured".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| LlmError::Failed("child stderr was not captured".to_string()))?;

        let mut out = Vec::new();
        let mut err = Vec::new();

        let wait = async {
            let (status, _, _) = tokio::try_join!(
                child.wait(),
                stdout.read_to_end(&mut out),
                stderr.read_to_end(&mut err),
            )?;
            Ok::<_, std::io::Error>(status)
        };

        let waited = tokio::time::timeout(self.timeout, wait).await;
        let status = match waited {
            Ok(result) => result?,
            Err(_) => {
                if let Err(e) = child.start_kill() {
                    warn!("failed to kill timed-out {} process: {}", program, e);
                }
                return Err(LlmError::Timeout(self.timeout.as_secs()));
            }
        };

        // Diagnostic output from the runtime is logged, never surfaced
        if !err.is_empty() {
            debug!("{} stderr: {}", program, String::from_utf8_lossy(&err).trim());
        }

        if !status.success() {
            let stderr_text = String::from_utf8_lossy(&err);
            return Err(LlmError::Failed(stderr_text.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }
}

#[async_trait]
impl ModelRunner for OllamaRunner {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(model = %self.model, "invoking {}", self.binary);
        self.invoke(&self.binary, &["run", &self.model], prompt).await
    }

    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner_with_timeout(millis: u64) -> OllamaRunner {
        OllamaRunner {
            binary: "ollama".to_string(),
            model: "llama3".to_string(),
            timeout: Duration::from_millis(millis),
        }
    }

    #[tokio::test]
    async fn test_invoke_echoes_stdin() {
        let runner = runner_with_timeout(5_000);
        let reply = runner.invoke("cat", &[], "hello there").await.unwrap();
        assert_eq!(reply, "hello there");
    }

    #[tokio::test]
    async fn test_invoke_trims_output() {
        let runner = runner_with_timeout(5_000);
        let reply = runner.invoke("cat", &[], "  padded  \n\n").await.unwrap();
        assert_eq!(reply, "padded");
    }

    #[tokio::test]
    async fn test_invoke_kills_on_timeout() {
        let runner = runner_with_timeout(100);
        let err = runner.invoke("sleep", &["5"], "").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_maps_to_runtime_not_found() {
        let runner = runner_with_timeout(5_000);
        let err = runner
            .invoke("definitely-not-a-real-llm-runtime", &[], "hi")
            .await
            .unwrap_err();
        match err {
            LlmError::RuntimeNotFound(name) => {
                assert_eq!(name, "definitely-not-a-real-llm-runtime")
            }
            other => panic!("expected RuntimeNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_surfaces_stderr() {
        let runner = runner_with_timeout(5_000);
        let err = runner
            .invoke("sh", &["-c", "echo broken >&2; exit 3"], "")
            .await
            .unwrap_err();
        match err {
            LlmError::Failed(msg) => assert!(msg.contains("broken")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}
