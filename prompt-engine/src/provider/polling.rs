//! Provider over an asynchronous task backend: submit once, poll until the task finishes.
//!
//! Polling is bounded by [`PollConfig::timeout`] and stops early on cancellation. Transport
//! (HTTP, queues, auth) belongs to the [`TaskBackend`] implementor.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::wire::{extract_reply, to_wire, WireMessage};
use super::CompletionProvider;
use crate::error::ProviderError;
use crate::message::Message;

pub const POLL_INTERVAL_ENV: &str = "PROMPT_ENGINE_POLL_INTERVAL_MS";
pub const POLL_TIMEOUT_ENV: &str = "PROMPT_ENGINE_POLL_TIMEOUT_MS";

const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Polling cadence and upper bound for one completion.
///
/// The timeout covers the whole completion: submit, every status call and the sleeps
/// between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PollConfig {
    /// An `interval` below 1 ms is raised to 1 ms so a pending task is never polled in a
    /// tight loop.
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            timeout,
        }
    }

    /// Reads `PROMPT_ENGINE_POLL_INTERVAL_MS` and `PROMPT_ENGINE_POLL_TIMEOUT_MS`.
    /// Missing, unparsable or zero values keep the defaults (250 ms / 120 s).
    pub fn from_env() -> Self {
        Self {
            interval: env_millis(POLL_INTERVAL_ENV, DEFAULT_INTERVAL),
            timeout: env_millis(POLL_TIMEOUT_ENV, DEFAULT_TIMEOUT),
        }
    }
}

fn env_millis(key: &str, default: Duration) -> Duration {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            tracing::warn!(key, value = %raw, "invalid duration, using default");
            default
        }
    }
}

/// Status of a backend task. Mirrors the Celery result states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Started,
    Retry,
    /// Finished; holds the raw transcript.
    Success(String),
    /// Failed; holds the backend's reason.
    Failure(String),
    Revoked,
}

impl TaskState {
    /// Parses a `task_status` string plus optional `task_result` payload.
    pub fn from_celery(status: &str, result: Option<&str>) -> Result<Self, ProviderError> {
        let result = result.unwrap_or_default().to_string();
        match status {
            "PENDING" => Ok(Self::Pending),
            "STARTED" => Ok(Self::Started),
            "RETRY" => Ok(Self::Retry),
            "SUCCESS" => Ok(Self::Success(result)),
            "FAILURE" => Ok(Self::Failure(result)),
            "REVOKED" => Ok(Self::Revoked),
            other => Err(ProviderError::MalformedResponse(format!(
                "unknown task status: {other}"
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failure(_) | Self::Revoked)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Started => "STARTED",
            Self::Retry => "RETRY",
            Self::Success(_) => "SUCCESS",
            Self::Failure(_) => "FAILURE",
            Self::Revoked => "REVOKED",
        }
    }
}

/// An inference service that runs completions as background tasks.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Enqueues a completion; returns the task id.
    async fn submit(&self, messages: &[WireMessage]) -> Result<String, ProviderError>;

    async fn status(&self, task_id: &str) -> Result<TaskState, ProviderError>;
}

pub struct PollingProvider<B> {
    backend: B,
    config: PollConfig,
}

impl<B: TaskBackend> PollingProvider<B> {
    pub fn new(backend: B, config: PollConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    async fn run(
        &self,
        messages: &[Message],
        cancel: &CancellationToken,
    ) -> Result<Message, ProviderError> {
        let wire = to_wire(messages);
        let started = Instant::now();
        let deadline = started + self.config.timeout;
        let task_id = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            id = tokio::time::timeout_at(deadline, self.backend.submit(&wire)) => match id {
                Ok(id) => id?,
                // No id was ever assigned.
                Err(_) => return Err(timed_out("", started)),
            },
        };
        tracing::debug!(%task_id, messages = wire.len(), "task submitted");
        let raw = self.wait(&task_id, started, deadline, cancel).await?;
        Ok(Message::assistant(extract_reply(&raw)))
    }

    async fn wait(
        &self,
        task_id: &str,
        started: Instant,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        loop {
            let state = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                state = tokio::time::timeout_at(deadline, self.backend.status(task_id)) => match state {
                    Ok(state) => state?,
                    Err(_) => return Err(timed_out(task_id, started)),
                },
            };
            match state {
                TaskState::Success(raw) => {
                    tracing::debug!(task_id, elapsed = ?started.elapsed(), "task finished");
                    return Ok(raw);
                }
                TaskState::Failure(reason) => {
                    return Err(ProviderError::TaskFailed {
                        task_id: task_id.to_string(),
                        status: format!("FAILURE: {reason}"),
                    });
                }
                TaskState::Revoked => {
                    return Err(ProviderError::TaskFailed {
                        task_id: task_id.to_string(),
                        status: TaskState::Revoked.label().to_string(),
                    });
                }
                pending => tracing::trace!(task_id, status = pending.label(), "task not done"),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(timed_out(task_id, started));
            }
            let wake = (now + self.config.interval).min(deadline);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
                _ = tokio::time::sleep_until(wake) => {}
            }
        }
    }
}

fn timed_out(task_id: &str, started: Instant) -> ProviderError {
    ProviderError::Timeout {
        task_id: task_id.to_string(),
        elapsed: started.elapsed(),
    }
}

#[async_trait]
impl<B: TaskBackend> CompletionProvider for PollingProvider<B> {
    fn name(&self) -> &str {
        "polling"
    }

    async fn complete(&self, messages: &[Message]) -> Result<Message, ProviderError> {
        self.run(messages, &CancellationToken::new()).await
    }

    async fn complete_with_cancel(
        &self,
        messages: &[Message],
        cancel: &CancellationToken,
    ) -> Result<Message, ProviderError> {
        self.run(messages, cancel).await
    }
}
