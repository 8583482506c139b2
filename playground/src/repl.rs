//! Interactive REPL loop: read stdin, prompt the conversation, print the reply, repeat.
//!
//! Ctrl+C during a turn cancels the provider call; the turn is reported and the loop goes on.

use std::io::Write;

use prompt_engine::{Agent, CancellationToken, Conversation, EngineError, Message, ProviderError};
use tokio::io::{AsyncBufReadExt, BufReader};

fn is_quit_command(s: &str) -> bool {
    matches!(s.trim(), "quit" | "exit" | "/quit")
}

/// Runs one prompt; Ctrl+C cancels it through `cancel`.
pub async fn prompt_or_interrupt<A: Agent>(
    conversation: &mut Conversation<A>,
    input: &str,
    cancel: &CancellationToken,
) -> Result<Message, EngineError> {
    let trigger = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    let result = conversation.prompt_with_cancel(input, cancel).await;
    watcher.abort();
    if let Ok(ref reply) = result {
        reply.pprint();
    }
    result
}

/// Exits on EOF (Ctrl+D) or `quit`/`exit`/`/quit`. Turn errors go to stderr.
pub async fn run_repl_loop<A: Agent>(
    conversation: &mut Conversation<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        let cancel = CancellationToken::new();
        match prompt_or_interrupt(conversation, &line, &cancel).await {
            Ok(_) => {}
            Err(EngineError::Provider(ProviderError::Cancelled)) => eprintln!("(cancelled)"),
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_commands() {
        assert!(is_quit_command("quit"));
        assert!(is_quit_command(" exit "));
        assert!(is_quit_command("/quit"));
        assert!(!is_quit_command("quitting"));
    }
}
