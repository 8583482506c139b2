//! Agents: conversational policies that build and run one chain per prompt.
//!
//! An [`Agent`] decides how a turn's chain is seeded ([`Agent::create_chain`]), how it is
//! executed ([`Agent::execute_next_chain`]) and how the provider's reply is tagged before it
//! lands on the chain ([`Agent::process_completion`]). The fixed prompt cycle itself lives in
//! [`Conversation`](crate::Conversation), which owns the agent and its history.
//!
//! # Variants
//!
//! - **[`ToolUseAgent`]**: primes the model with a tool-use format and hides replies that
//!   announce a tool call.
//! - **[`ChatAgent`]**: plain chat with an optional system prompt.

mod chat;
mod tool_use;

pub use chat::ChatAgent;
pub use tool_use::{needs_tool, ToolDescription, ToolUseAgent, TOOL_USE_MARKER};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::chain::Chain;
use crate::error::EngineError;
use crate::message::Message;

/// When [`Agent::setup`] runs relative to prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SetupPolicy {
    /// Once per conversation, before the first chain.
    #[default]
    Once,
    /// Before every chain.
    PerChain,
}

/// Conversational policy driven by [`Conversation::prompt`](crate::Conversation::prompt).
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    fn setup_policy(&self) -> SetupPolicy {
        SetupPolicy::Once
    }

    /// Prepares priming state (system prompts, few-shot examples) used by
    /// [`create_chain`](Self::create_chain).
    async fn setup(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Builds the chain for the next turn from the abridged history and the user's input.
    ///
    /// Must not push the input itself; [`execute_next_chain`](Self::execute_next_chain) does.
    async fn create_chain(&self, history: &[Message], input: &str) -> Result<Chain, EngineError>;

    /// Tags the provider's reply and pushes it onto `chain`. Default pushes it unchanged.
    fn process_completion(&self, message: Message, chain: &mut Chain) {
        chain.push(message);
    }

    /// Pushes the input as a user message, completes the chain and hands the reply to
    /// [`process_completion`](Self::process_completion).
    ///
    /// On failure nothing beyond the input message is pushed.
    async fn execute_next_chain(
        &self,
        chain: &mut Chain,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<(), EngineError> {
        chain.push(Message::user(input));
        let completion = chain.complete_with_cancel(cancel).await?;
        self.process_completion(completion, chain);
        Ok(())
    }
}
