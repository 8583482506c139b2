//! Message and role types: one turn of a conversation.
//!
//! A [`Message`] carries a [`Role`], opaque text content and an inner-dialogue flag.
//! Inner-dialogue messages are internal reasoning (tool-use thoughts, replayed context,
//! priming prompts) that the provider sees but that is dropped from the collapsed,
//! user-visible view of a [`Chain`](crate::Chain).

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

const ANSI_RESET: &str = "\x1b[0m";

/// Who authored a message. Closed set; unknown role strings are rejected by [`Role::from_str`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// ANSI SGR parameter for this role's color (gray, cyan, amber).
    fn sgr_color(&self) -> &'static str {
        match self {
            Self::System => "90",
            Self::User => "36",
            Self::Assistant => "33",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(EngineError::UnknownRole(s.to_string())),
        }
    }
}

/// A single conversation turn.
///
/// Role and content are fixed at construction. Only the inner-dialogue flag may change,
/// typically once in [`Agent::process_completion`](crate::Agent::process_completion)
/// before the message is pushed onto a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
    #[serde(default)]
    is_inner_dialogue: bool,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            is_inner_dialogue: false,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Builder form of [`set_inner_dialogue(true)`](Self::set_inner_dialogue).
    pub fn inner_dialogue(mut self) -> Self {
        self.is_inner_dialogue = true;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_inner_dialogue(&self) -> bool {
        self.is_inner_dialogue
    }

    pub fn set_inner_dialogue(&mut self, inner: bool) {
        self.is_inner_dialogue = inner;
    }

    /// ANSI escape that opens this message's color. Inner dialogue is rendered bold.
    pub fn color_code(&self) -> String {
        if self.is_inner_dialogue {
            format!("\x1b[1;{}m", self.role.sgr_color())
        } else {
            format!("\x1b[{}m", self.role.sgr_color())
        }
    }

    /// `ROLE: content` wrapped in the role color, for terminal diagnostics.
    pub fn render(&self) -> String {
        format!("{}{}{}", self.color_code(), self, ANSI_RESET)
    }

    /// Prints [`render`](Self::render) to stdout.
    pub fn pprint(&self) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", self.render());
    }
}

/// Plain `ROLE: content`, no escape codes.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.role.as_str().to_uppercase(),
            self.content
        )
    }
}
