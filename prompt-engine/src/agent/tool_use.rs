//! Tool-use agent: ReAct-style priming, tool-call replies hidden from the user.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Agent, SetupPolicy};
use crate::chain::Chain;
use crate::error::EngineError;
use crate::message::{Message, Role};
use crate::provider::CompletionProvider;

/// Line a reply starts with when the model wants a tool instead of answering.
pub const TOOL_USE_MARKER: &str = "Thought: Do I need to use a tool? Yes";

const PREAMBLE_TEMPLATE: &str = "You are a helpful AI assistant, here are some details about your capabilities.
TOOLS:
------

Assistant has access to the following tools:
{tools}

To use a tool, please use the following format:

```
Thought: Do I need to use a tool? Yes
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
```

When you have a response to say to the Human, or if you do not need to use a tool, you MUST use the format:

```
Thought: Do I need to use a tool? No
Assistant: [your response here]
```

The conversation will begin now:";

/// A tool the model may ask for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
}

impl ToolDescription {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The web search tool the playground advertises.
    pub fn web_search() -> Self {
        Self::new(
            "WEB_SEARCH",
            "a tool which can search the web and return the results",
        )
    }
}

/// Agent that primes each chain with a tool-use preamble and flags replies containing
/// [`TOOL_USE_MARKER`] as inner dialogue.
///
/// Each chain is seeded with the preamble and the prior abridged history, both as inner
/// dialogue, so the model sees the whole conversation while the abridged history keeps
/// only user inputs and final answers.
///
/// The priming system message is inner dialogue too, so it never shows up in
/// [`ConversationHistory::abridged_history`](crate::ConversationHistory::abridged_history);
/// read it from [`Chain::messages`] or [`preamble`](Self::preamble) instead.
pub struct ToolUseAgent {
    provider: Arc<dyn CompletionProvider>,
    tools: Vec<ToolDescription>,
    replay_history: bool,
    preamble: Option<String>,
}

impl ToolUseAgent {
    pub fn new(provider: Arc<dyn CompletionProvider>, tools: Vec<ToolDescription>) -> Self {
        Self {
            provider,
            tools,
            replay_history: true,
            preamble: None,
        }
    }

    /// Whether earlier turns are replayed into each new chain. Default `true`.
    pub fn with_history_replay(mut self, replay: bool) -> Self {
        self.replay_history = replay;
        self
    }

    pub fn tools(&self) -> &[ToolDescription] {
        &self.tools
    }

    /// The rendered preamble, once [`setup`](Agent::setup) has run.
    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    fn render_preamble(&self) -> String {
        let tools = self
            .tools
            .iter()
            .map(|t| format!("{} -- {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");
        let names = self
            .tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        PREAMBLE_TEMPLATE
            .replace("{tools}", &tools)
            .replace("{tool_names}", &names)
    }
}

/// True when `content` announces a tool call.
pub fn needs_tool(content: &str) -> bool {
    content.contains(TOOL_USE_MARKER)
}

#[async_trait]
impl Agent for ToolUseAgent {
    fn name(&self) -> &str {
        "tool_use"
    }

    fn setup_policy(&self) -> SetupPolicy {
        SetupPolicy::Once
    }

    async fn setup(&mut self) -> Result<(), EngineError> {
        if self.tools.is_empty() {
            return Err(EngineError::Misconfigured(
                "tool_use agent needs at least one tool".to_string(),
            ));
        }
        self.preamble = Some(self.render_preamble());
        Ok(())
    }

    async fn create_chain(&self, history: &[Message], _input: &str) -> Result<Chain, EngineError> {
        let preamble = self.preamble.as_ref().ok_or_else(|| {
            EngineError::Misconfigured("setup must run before create_chain".to_string())
        })?;
        let mut chain = Chain::new(self.provider.clone());
        chain.push(Message::system(preamble.clone()).inner_dialogue());
        if self.replay_history {
            for m in history.iter().filter(|m| m.role() != Role::System) {
                chain.push(m.clone().inner_dialogue());
            }
        }
        Ok(chain)
    }

    fn process_completion(&self, mut message: Message, chain: &mut Chain) {
        if needs_tool(message.content()) {
            tracing::debug!(agent = self.name(), "reply requests a tool, hiding it");
            message.set_inner_dialogue(true);
        }
        chain.push(message);
    }
}
