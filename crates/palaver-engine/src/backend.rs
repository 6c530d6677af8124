//! Chat backends.
//!
//! A [`ChatBackend`] answers one message at a time and reports whether it
//! can currently accept calls. [`CommandBackend`] drives a chat CLI such as
//! `claude -p`.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Raw reply from a backend: a JSON string or a structured object.
pub type Reply = Value;

/// Text used when a reply has no recognizable text.
pub const NO_REPLY_TEXT: &str = "No reply received.";

/// Argument placeholder replaced by the message text.
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Errors raised by a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend command could not be started.
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error talking to the backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend exited unsuccessfully.
    #[error("{command} exited with code {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Backend rejected the message with a description.
    #[error("{0}")]
    Rejected(String),

    /// No command configured.
    #[error("no backend command configured")]
    NotConfigured,
}

/// An AI chat service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether the backend can accept calls right now.
    fn is_ready(&self) -> bool;

    /// Send one message and wait for the reply.
    async fn chat(&self, message: &str) -> Result<Reply, BackendError>;
}

/// Pull display text out of a reply.
///
/// A JSON string is used as-is, then `message.content` if it is a string;
/// anything else gives [`NO_REPLY_TEXT`].
pub fn extract_reply_text(reply: &Reply) -> String {
    if let Some(text) = reply.as_str() {
        return text.to_string();
    }
    reply
        .pointer("/message/content")
        .and_then(Value::as_str)
        .map_or_else(|| NO_REPLY_TEXT.to_string(), str::to_string)
}

/// Backend that runs a chat CLI once per message.
///
/// The message is written to stdin, or substituted for a `{message}`
/// argument when the argv contains one.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    name: String,
    command_argv: Vec<String>,
}

impl CommandBackend {
    /// Create a backend for the given argv.
    pub fn new(name: impl Into<String>, command_argv: Vec<String>) -> Self {
        Self {
            name: name.into(),
            command_argv,
        }
    }

    /// Program to run, if configured.
    pub fn program(&self) -> Option<&str> {
        self.command_argv.first().map(String::as_str)
    }

    /// Resolved path of the program on `PATH`.
    pub fn resolve(&self) -> Option<PathBuf> {
        self.program().and_then(|p| which::which(p).ok())
    }

    fn uses_stdin(&self) -> bool {
        !self
            .command_argv
            .iter()
            .skip(1)
            .any(|arg| arg.contains(MESSAGE_PLACEHOLDER))
    }

    fn build_command(&self, program: &str, message: &str) -> Command {
        let mut cmd = Command::new(program);
        for arg in self.command_argv.iter().skip(1) {
            cmd.arg(arg.replace(MESSAGE_PLACEHOLDER, message));
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ChatBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.resolve().is_some()
    }

    async fn chat(&self, message: &str) -> Result<Reply, BackendError> {
        let program = self.program().ok_or(BackendError::NotConfigured)?;
        let mut child = self
            .build_command(program, message)
            .spawn()
            .map_err(|source| BackendError::Spawn {
                command: program.to_string(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if self.uses_stdin() {
                // A CLI that exits without reading stdin closes the pipe early
                if let Err(e) = stdin.write_all(message.as_bytes()).await {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(e.into());
                    }
                }
            }
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(BackendError::Failed {
                command: program.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        // Some CLIs answer on stderr
        let response = if stdout.trim().is_empty() {
            stderr
        } else {
            stdout
        };
        debug!(backend = %self.name, bytes = response.len(), "Backend replied");
        Ok(parse_command_output(&response))
    }
}

/// A JSON object on stdout is a structured reply; anything else is text.
fn parse_command_output(output: &str) -> Reply {
    let trimmed = output.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::String(trimmed.to_string()),
    }
}
