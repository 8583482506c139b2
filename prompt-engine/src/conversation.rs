//! Conversation: runs the fixed prompt cycle for one agent and records every chain.
//!
//! Cycle per [`Conversation::prompt`]: setup (per [`SetupPolicy`]) → `create_chain` from the
//! abridged history → push the chain onto the history → `execute_next_chain`. The chain is
//! recorded before it runs, so a failed turn still shows up in the history with its input
//! and without a reply.
//!
//! `prompt` takes `&mut self`, so turns on one conversation never overlap. To share a
//! conversation between tasks, put it behind a `tokio::sync::Mutex`.

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::agent::{Agent, SetupPolicy};
use crate::error::EngineError;
use crate::history::ConversationHistory;
use crate::message::Message;

pub struct Conversation<A> {
    agent: A,
    history: ConversationHistory,
    setup_done: bool,
}

impl<A: Agent> Conversation<A> {
    /// Wraps `agent` with an empty history. Setup runs lazily on the first prompt.
    pub fn new(agent: A) -> Self {
        Self {
            agent,
            history: ConversationHistory::new(),
            setup_done: false,
        }
    }

    /// Like [`new`](Self::new), but runs setup right away for [`SetupPolicy::Once`] agents.
    pub async fn start(agent: A) -> Result<Self, EngineError> {
        let mut conversation = Self::new(agent);
        if conversation.agent.setup_policy() == SetupPolicy::Once {
            conversation.agent.setup().await?;
            conversation.setup_done = true;
        }
        Ok(conversation)
    }

    /// Runs one turn and returns the message that ended the chain (normally the reply).
    ///
    /// A turn whose agent pushes nothing after the input fails with
    /// [`EngineError::EmptyChain`]; the chain stays recorded.
    pub async fn prompt(&mut self, input: &str) -> Result<Message, EngineError> {
        self.prompt_with_cancel(input, &CancellationToken::new())
            .await
    }

    /// [`prompt`](Self::prompt) that aborts the provider call when `cancel` fires.
    /// The chain keeps its input message; the in-flight reply is dropped.
    pub async fn prompt_with_cancel(
        &mut self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<Message, EngineError> {
        let span = tracing::info_span!(
            "prompt",
            agent = self.agent.name(),
            turn = self.history.len()
        );
        self.run_turn(input, cancel).instrument(span).await
    }

    async fn run_turn(
        &mut self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<Message, EngineError> {
        let run_setup = match self.agent.setup_policy() {
            SetupPolicy::Once => !self.setup_done,
            SetupPolicy::PerChain => true,
        };
        if run_setup {
            self.agent.setup().await?;
            self.setup_done = true;
        }

        let abridged = self.history.abridged_history();
        let chain = self.agent.create_chain(&abridged, input).await?;
        tracing::debug!(seeded = chain.len(), "chain created");

        let chain = self.history.push_and_get(chain);
        let seeded = chain.len();
        if let Err(e) = self.agent.execute_next_chain(chain, input, cancel).await {
            tracing::info!(error = %e, "turn failed");
            return Err(e);
        }
        // The input lands at `seeded`; anything after it is the reply.
        if chain.len() <= seeded + 1 {
            tracing::info!(messages = chain.len(), "turn produced no reply");
            return Err(EngineError::EmptyChain);
        }
        let reply = chain.try_peek()?.clone();
        tracing::info!(
            messages = chain.len(),
            inner = reply.is_inner_dialogue(),
            "turn complete"
        );
        Ok(reply)
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    pub fn into_parts(self) -> (A, ConversationHistory) {
        (self.agent, self.history)
    }
}
