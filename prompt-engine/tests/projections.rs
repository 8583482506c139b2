//! Property tests for chain and history projections.
//!
//! 1. `messages()` returns pushes in order, unmodified.
//! 2. `collapsed()` is exactly the non-inner-dialogue subsequence.
//! 3. History projections are the in-order concatenation of chain projections.
//! 4. Projections are stable across repeated calls.

mod init_logging;

use std::sync::Arc;

use prompt_engine::{Chain, ConversationHistory, Message, MockProvider, Role};
use proptest::prelude::*;

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::System), Just(Role::User), Just(Role::Assistant)]
}

fn message_strategy() -> impl Strategy<Value = Message> {
    (role_strategy(), "[a-zA-Z0-9 ?:\n]{0,40}", any::<bool>()).prop_map(|(role, content, inner)| {
        let mut m = Message::new(role, content);
        m.set_inner_dialogue(inner);
        m
    })
}

fn build_chain(messages: &[Message]) -> Chain {
    let mut chain = Chain::new(Arc::new(MockProvider::new("unused")));
    for m in messages {
        chain.push(m.clone());
    }
    chain
}

proptest! {
    #[test]
    fn messages_preserve_push_order(msgs in prop::collection::vec(message_strategy(), 0..30)) {
        let chain = build_chain(&msgs);
        prop_assert_eq!(chain.messages(), msgs.as_slice());
        prop_assert_eq!(chain.peek(), msgs.last());
    }

    #[test]
    fn collapsed_is_visible_subsequence(msgs in prop::collection::vec(message_strategy(), 0..30)) {
        let chain = build_chain(&msgs);
        let expected: Vec<Message> =
            msgs.iter().filter(|m| !m.is_inner_dialogue()).cloned().collect();
        prop_assert_eq!(chain.collapsed(), expected);
    }

    #[test]
    fn history_concatenates_chains(
        chains in prop::collection::vec(prop::collection::vec(message_strategy(), 0..8), 0..6)
    ) {
        let mut history = ConversationHistory::new();
        for msgs in &chains {
            history.push(build_chain(msgs));
        }
        let full: Vec<Message> = chains.iter().flatten().cloned().collect();
        let abridged: Vec<Message> =
            full.iter().filter(|m| !m.is_inner_dialogue()).cloned().collect();
        prop_assert_eq!(history.full_history(), full);
        prop_assert_eq!(history.abridged_history(), abridged);
        prop_assert_eq!(history.len(), chains.len());
    }

    #[test]
    fn projections_are_idempotent(
        chains in prop::collection::vec(prop::collection::vec(message_strategy(), 0..8), 0..6)
    ) {
        let mut history = ConversationHistory::new();
        for msgs in &chains {
            history.push(build_chain(msgs));
        }
        prop_assert_eq!(history.full_history(), history.full_history());
        prop_assert_eq!(history.abridged_history(), history.abridged_history());
        for chain in history.chains() {
            prop_assert_eq!(chain.collapsed(), chain.collapsed());
            prop_assert_eq!(chain.messages(), chain.messages());
        }
    }
}

#[test]
fn push_user_hello_then_peek() {
    let mut chain = build_chain(&[]);
    assert!(chain.peek().is_none());
    chain.push(Message::user("hello"));
    let m = chain.peek().expect("one message");
    assert_eq!(m.role(), Role::User);
    assert_eq!(m.content(), "hello");
}
