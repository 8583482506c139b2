//! Error types for providers and the engine.
//!
//! [`ProviderError`] is what a [`CompletionProvider`](crate::CompletionProvider) returns;
//! [`EngineError`] wraps it unchanged and adds the engine's own failures.

use std::time::Duration;

use thiserror::Error;

/// Failure of a completion provider call. The engine never retries these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connection refused, DNS, broken stream).
    #[error("request failed: {0}")]
    Request(String),
    /// Backend answered with a non-success status.
    #[error("backend returned status {code}: {message}")]
    Status { code: u16, message: String },
    /// Backend answered but the payload could not be turned into a message.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// An asynchronous backend task reached a failed terminal state.
    #[error("task {task_id} ended with status {status}")]
    TaskFailed { task_id: String, status: String },
    /// An asynchronous backend task did not finish in time. `task_id` is empty when the
    /// submit call itself ran out the clock.
    #[error("task {task_id} did not finish within {elapsed:?}")]
    Timeout { task_id: String, elapsed: Duration },
    #[error("completion cancelled")]
    Cancelled,
    /// A scripted provider ran out of replies.
    #[error("no replies left")]
    Exhausted,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("provider failure: {0}")]
    Provider(#[from] ProviderError),
    #[error("chain has no messages")]
    EmptyChain,
    #[error("agent misconfigured: {0}")]
    Misconfigured(String),
    #[error("unknown role: {0} (use system, user, or assistant)")]
    UnknownRole(String),
}

impl EngineError {
    /// The underlying provider error, if this is a provider failure.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_converts_and_is_recoverable() {
        let err: EngineError = ProviderError::Cancelled.into();
        assert_eq!(err.provider_error(), Some(&ProviderError::Cancelled));
        assert!(EngineError::EmptyChain.provider_error().is_none());
    }

    #[test]
    fn messages_name_the_failure() {
        let err = ProviderError::Status {
            code: 503,
            message: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "backend returned status 503: overloaded");
        let err = EngineError::Misconfigured("setup not run".into());
        assert!(err.to_string().contains("setup not run"));
    }
}
