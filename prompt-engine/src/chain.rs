//! Chain: the ordered messages of one conversational turn, bound to one provider.
//!
//! Typically the first message primes the model, then comes the end user's prompt, and the
//! last message is the reply. Agents may inject inner-dialogue messages in between to
//! steer the model; those reach the provider but are left out of [`Chain::collapsed`].

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::message::Message;
use crate::provider::CompletionProvider;

/// Append-only message sequence plus the provider that completes it.
pub struct Chain {
    messages: Vec<Message>,
    provider: Arc<dyn CompletionProvider>,
}

impl Chain {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            messages: Vec::new(),
            provider,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Last pushed message; `None` for an empty chain.
    pub fn peek(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Like [`peek`](Self::peek) but an empty chain is an [`EngineError::EmptyChain`].
    pub fn try_peek(&self) -> Result<&Message, EngineError> {
        self.peek().ok_or(EngineError::EmptyChain)
    }

    /// Every message in push order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages not flagged as inner dialogue, in push order.
    pub fn collapsed(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| !m.is_inner_dialogue())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// Sends the full sequence, inner dialogue included, to the provider and returns its
    /// reply. The reply is not pushed; the caller decides what to do with it.
    pub async fn complete(&self) -> Result<Message, EngineError> {
        self.complete_with_cancel(&CancellationToken::new()).await
    }

    /// [`complete`](Self::complete) that stops with
    /// [`ProviderError::Cancelled`](crate::ProviderError::Cancelled) once `cancel` fires.
    pub async fn complete_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Message, EngineError> {
        tracing::debug!(
            provider = self.provider.name(),
            messages = self.messages.len(),
            "completing chain"
        );
        let reply = self
            .provider
            .complete_with_cancel(&self.messages, cancel)
            .await?;
        Ok(reply)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("provider", &self.provider.name())
            .field("messages", &self.messages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::MockProvider;

    fn chain_with(provider: MockProvider) -> (Chain, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        (Chain::new(provider.clone()), provider)
    }

    #[test]
    fn peek_on_empty_chain_is_none() {
        let (chain, _) = chain_with(MockProvider::new("x"));
        assert!(chain.peek().is_none());
        assert!(matches!(chain.try_peek(), Err(EngineError::EmptyChain)));
        assert!(chain.is_empty());
    }

    #[test]
    fn push_then_peek_returns_last() {
        let (mut chain, _) = chain_with(MockProvider::new("x"));
        chain.push(Message::system("s"));
        chain.push(Message::user("hello"));
        let last = chain.peek().unwrap();
        assert_eq!(last.role(), crate::Role::User);
        assert_eq!(last.content(), "hello");
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn collapsed_drops_inner_dialogue_in_order() {
        let (mut chain, _) = chain_with(MockProvider::new("x"));
        chain.push(Message::system("s"));
        chain.push(Message::assistant("thought").inner_dialogue());
        chain.push(Message::user("u"));
        assert_eq!(chain.collapsed(), vec![Message::system("s"), Message::user("u")]);
        assert_eq!(chain.messages().len(), 3);
    }

    #[tokio::test]
    async fn complete_sends_full_sequence_and_does_not_push() {
        let (mut chain, provider) = chain_with(MockProvider::new("reply"));
        chain.push(Message::system("priming").inner_dialogue());
        chain.push(Message::user("q"));
        let reply = chain.complete().await.unwrap();
        assert_eq!(reply, Message::assistant("reply"));
        assert_eq!(chain.len(), 2);
        assert_eq!(provider.calls()[0], chain.messages().to_vec());
    }

    #[tokio::test]
    async fn complete_propagates_provider_error() {
        let (mut chain, _) =
            chain_with(MockProvider::failing(ProviderError::Request("refused".into())));
        chain.push(Message::user("q"));
        let err = chain.complete().await.unwrap_err();
        assert_eq!(
            err.provider_error(),
            Some(&ProviderError::Request("refused".into()))
        );
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn debug_shows_provider_name() {
        let (chain, _) = chain_with(MockProvider::new("x"));
        assert!(format!("{chain:?}").contains("mock"));
    }
}
