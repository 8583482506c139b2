//! Conversation history: the chains of a conversation in the order they ran.
//!
//! A history has no provider of its own; each chain may target a different model.
//! Collapsing every chain yields the messages the end user saw.

use crate::chain::Chain;
use crate::message::Message;

/// Append-only sequence of chains.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    chains: Vec<Chain>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chain: Chain) {
        self.chains.push(chain);
    }

    /// Appends and hands back the stored chain so the caller can keep driving it.
    pub(crate) fn push_and_get(&mut self, chain: Chain) -> &mut Chain {
        self.chains.push(chain);
        let last = self.chains.len() - 1;
        &mut self.chains[last]
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn last(&self) -> Option<&Chain> {
        self.chains.last()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Every chain's collapsed view, concatenated in chain order.
    pub fn abridged_history(&self) -> Vec<Message> {
        self.chains.iter().flat_map(|c| c.collapsed()).collect()
    }

    /// Every chain's full message list, concatenated in chain order.
    pub fn full_history(&self) -> Vec<Message> {
        self.chains
            .iter()
            .flat_map(|c| c.messages().iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::provider::MockProvider;

    fn chain(messages: Vec<Message>) -> Chain {
        let mut c = Chain::new(Arc::new(MockProvider::new("unused")));
        for m in messages {
            c.push(m);
        }
        c
    }

    #[test]
    fn empty_history_projects_to_nothing() {
        let h = ConversationHistory::new();
        assert!(h.is_empty());
        assert!(h.last().is_none());
        assert!(h.abridged_history().is_empty());
        assert!(h.full_history().is_empty());
    }

    #[test]
    fn multi_chain_projections() {
        let mut h = ConversationHistory::new();
        h.push(chain(vec![
            Message::system("S"),
            Message::user("U1"),
            Message::assistant("A1").inner_dialogue(),
        ]));
        h.push(chain(vec![Message::user("U2"), Message::assistant("A2")]));

        assert_eq!(
            h.abridged_history(),
            vec![
                Message::system("S"),
                Message::user("U1"),
                Message::user("U2"),
                Message::assistant("A2"),
            ]
        );
        let full = h.full_history();
        assert_eq!(full.len(), 5);
        assert_eq!(full[2], Message::assistant("A1").inner_dialogue());
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn push_and_get_returns_stored_chain() {
        let mut h = ConversationHistory::new();
        let stored = h.push_and_get(chain(vec![Message::user("a")]));
        stored.push(Message::assistant("b"));
        assert_eq!(h.last().unwrap().len(), 2);
    }
}
