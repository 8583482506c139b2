//! Wire shapes for transcript-style inference backends.
//!
//! These backends take `{role, content}` pairs with capitalized roles where the user is
//! called `Human`, and return one raw transcript in which turns are separated by
//! `### Human:` / `### Assistant: ` markers.

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};

const ASSISTANT_MARKER: &str = "### Assistant: ";
const HUMAN_MARKER: &str = "### Human:";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireRole {
    System,
    Human,
    Assistant,
}

impl From<Role> for WireRole {
    fn from(role: Role) -> Self {
        match role {
            Role::System => Self::System,
            Role::User => Self::Human,
            Role::Assistant => Self::Assistant,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(m: &Message) -> Self {
        Self {
            role: m.role().into(),
            content: m.content().to_string(),
        }
    }
}

/// Converts the whole sequence, inner dialogue included.
pub fn to_wire(messages: &[Message]) -> Vec<WireMessage> {
    messages.iter().map(WireMessage::from).collect()
}

/// Pulls the last assistant turn out of a raw transcript.
///
/// Takes the text after the last `### Assistant: ` marker (the whole text when there is
/// none), drops any `### Human:` marker the model started to emit, and trims.
pub fn extract_reply(raw: &str) -> String {
    let tail = raw.rsplit(ASSISTANT_MARKER).next().unwrap_or(raw);
    tail.replace(HUMAN_MARKER, "").trim().to_string()
}
