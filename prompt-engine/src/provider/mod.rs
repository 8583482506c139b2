//! Completion provider abstraction: given the messages so far, produce the next one.
//!
//! A [`Chain`](crate::Chain) is bound to one provider and forwards its full message
//! sequence on every [`complete`](crate::Chain::complete). Providers own their timeout,
//! retry and transport policy; the engine only awaits the result.
//!
//! Implementations here: [`MockProvider`] (fixed or scripted replies, for tests and the
//! playground) and [`PollingProvider`] (submits to an asynchronous [`TaskBackend`] and
//! polls until the task finishes).

mod mock;
mod polling;
pub mod wire;

pub use mock::MockProvider;
pub use polling::{PollConfig, PollingProvider, TaskBackend, TaskState};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::message::Message;

/// Produces the next message of a conversation.
///
/// Implementations must be safe for sequential reuse across many chains and keep no
/// hidden memory of earlier calls unless they document otherwise.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "provider"
    }

    /// Completes one turn from the full ordered message sequence.
    async fn complete(&self, messages: &[Message]) -> Result<Message, ProviderError>;

    /// Like [`complete`](Self::complete), but gives up with [`ProviderError::Cancelled`]
    /// once `cancel` fires.
    ///
    /// Default implementation races `complete` against the token and drops the in-flight
    /// future on cancellation. Providers that can abort remotely should override this.
    async fn complete_with_cancel(
        &self,
        messages: &[Message],
        cancel: &CancellationToken,
    ) -> Result<Message, ProviderError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.complete(messages) => result,
        }
    }
}
