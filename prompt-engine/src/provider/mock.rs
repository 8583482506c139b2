//! Mock provider: fixed or scripted replies, records what it was asked.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::CompletionProvider;
use crate::error::ProviderError;
use crate::message::Message;

/// Provider double for tests and the playground.
///
/// Scripted replies are consumed in order; once the script is empty the fallback
/// (if any) is returned on every call, otherwise [`ProviderError::Exhausted`].
/// Every call's input sequence is recorded and available through [`calls`](Self::calls).
#[derive(Debug)]
pub struct MockProvider {
    script: Mutex<VecDeque<Result<Message, ProviderError>>>,
    fallback: Option<Result<Message, ProviderError>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Always replies with an assistant message holding `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_fallback(Some(Ok(Message::assistant(content))))
    }

    /// Replies with `replies` in order, then fails with [`ProviderError::Exhausted`].
    pub fn scripted(replies: impl IntoIterator<Item = Message>) -> Self {
        let provider = Self::with_fallback(None);
        lock(&provider.script).extend(replies.into_iter().map(Ok));
        provider
    }

    /// Fails every call with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_fallback(Some(Err(error)))
    }

    fn with_fallback(fallback: Option<Result<Message, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues one more outcome ahead of the fallback.
    pub fn push_reply(&self, reply: Result<Message, ProviderError>) {
        lock(&self.script).push_back(reply);
    }

    /// Message sequences received so far, one entry per call.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[Message]) -> Result<Message, ProviderError> {
        lock(&self.calls).push(messages.to_vec());
        let next = lock(&self.script).pop_front();
        match next {
            Some(outcome) => outcome,
            None => self.fallback.clone().unwrap_or(Err(ProviderError::Exhausted)),
        }
    }
}
