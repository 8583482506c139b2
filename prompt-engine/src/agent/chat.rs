//! Plain chat agent.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Agent, SetupPolicy};
use crate::chain::Chain;
use crate::error::EngineError;
use crate::message::{Message, Role};
use crate::provider::CompletionProvider;

/// Replays the abridged history after an optional system prompt; replies are never hidden.
pub struct ChatAgent {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: Option<String>,
}

impl ChatAgent {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

#[async_trait]
impl Agent for ChatAgent {
    fn name(&self) -> &str {
        "chat"
    }

    fn setup_policy(&self) -> SetupPolicy {
        SetupPolicy::PerChain
    }

    async fn create_chain(&self, history: &[Message], _input: &str) -> Result<Chain, EngineError> {
        let mut chain = Chain::new(self.provider.clone());
        if let Some(ref prompt) = self.system_prompt {
            chain.push(Message::system(prompt.clone()).inner_dialogue());
        }
        for m in history.iter().filter(|m| m.role() != Role::System) {
            chain.push(m.clone().inner_dialogue());
        }
        Ok(chain)
    }
}
