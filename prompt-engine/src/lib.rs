//! # prompt-engine
//!
//! A small engine for structuring multi-turn conversations with a language model.
//! It tracks which messages the end user sees and which are internal reasoning, and
//! leaves inference to a pluggable [`CompletionProvider`].
//!
//! ## Building blocks
//!
//! - [`Message`]: role, content and an inner-dialogue flag.
//! - [`Chain`]: the messages of one turn, bound to one provider. [`Chain::complete`] sends
//!   the whole sequence; [`Chain::collapsed`] keeps only user-visible messages.
//! - [`ConversationHistory`]: chains in order; [`ConversationHistory::abridged_history`]
//!   and [`ConversationHistory::full_history`] flatten them.
//! - [`CompletionProvider`]: async "messages in, next message out". [`MockProvider`] for
//!   tests, [`PollingProvider`] for backends that run completions as background tasks.
//! - [`Agent`]: a conversational policy ([`ToolUseAgent`], [`ChatAgent`]).
//! - [`Conversation`]: owns an agent and its history and runs the fixed prompt cycle.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use prompt_engine::{Conversation, MockProvider, ToolDescription, ToolUseAgent};
//!
//! # async fn run() -> Result<(), prompt_engine::EngineError> {
//! let provider = Arc::new(MockProvider::new("Thought: Do I need to use a tool? No\nAssistant: Hi!"));
//! let agent = ToolUseAgent::new(provider, vec![ToolDescription::web_search()]);
//! let mut conversation = Conversation::start(agent).await?;
//! let reply = conversation.prompt("Hello").await?;
//! println!("{}", reply.render());
//! # Ok(())
//! # }
//! ```
//!
//! The library only emits `tracing` events; installing a subscriber is up to the binary.

pub mod agent;
pub mod chain;
pub mod conversation;
pub mod error;
pub mod history;
pub mod message;
pub mod provider;

pub use agent::{
    needs_tool, Agent, ChatAgent, SetupPolicy, ToolDescription, ToolUseAgent, TOOL_USE_MARKER,
};
pub use chain::Chain;
pub use conversation::Conversation;
pub use error::{EngineError, ProviderError};
pub use history::ConversationHistory;
pub use message::{Message, Role};
pub use provider::wire::{extract_reply, to_wire, WireMessage, WireRole};
pub use provider::{
    CompletionProvider, MockProvider, PollConfig, PollingProvider, TaskBackend, TaskState,
};

/// Re-exported so callers can cancel completions without depending on `tokio-util` directly.
pub use tokio_util::sync::CancellationToken;
