//! Playground binary: run a prompt-engine agent from the command line.
//!
//! No model is attached; replies come from a scripted provider (`--reply`, repeatable).
//! After the run the history is printed with role colors, or as JSON with `--json`.

mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use prompt_engine::{
    Agent, CancellationToken, ChatAgent, CompletionProvider, Conversation, ConversationHistory,
    Message, MockProvider, ToolDescription, ToolUseAgent,
};

const DEFAULT_REPLY: &str =
    "Thought: Do I need to use a tool? No\nAssistant: No model is attached to the playground; pass --reply to script answers.";

#[derive(Parser, Debug)]
#[command(name = "prompt-playground")]
#[command(about = "Run a prompt-engine agent against scripted replies")]
struct Args {
    /// Prompts to send, one turn each
    prompts: Vec<String>,

    /// Scripted provider reply; repeat for several turns
    #[arg(short, long = "reply", value_name = "TEXT")]
    replies: Vec<String>,

    /// Conversational policy
    #[arg(long, value_enum, default_value_t = AgentKind::Tool)]
    agent: AgentKind,

    /// System prompt for the chat agent
    #[arg(long, value_name = "TEXT", env = "PROMPT_ENGINE_SYSTEM_PROMPT")]
    system: Option<String>,

    /// Interactive REPL after the positional prompts
    #[arg(short, long)]
    interactive: bool,

    /// Print only the user-visible (abridged) history
    #[arg(long)]
    abridged: bool,

    /// Print the history as JSON instead of colored text
    #[arg(long)]
    json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", env = "PROMPT_ENGINE_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    /// Tool-use priming; tool requests are hidden
    Tool,
    /// Plain chat
    Chat,
}

fn make_provider(replies: &[String]) -> Arc<dyn CompletionProvider> {
    if replies.is_empty() {
        Arc::new(MockProvider::new(DEFAULT_REPLY))
    } else {
        Arc::new(MockProvider::scripted(
            replies.iter().map(|r| Message::assistant(r.replace("\\n", "\n"))),
        ))
    }
}

fn print_history(history: &ConversationHistory, abridged: bool, json: bool) -> serde_json::Result<()> {
    let messages = if abridged {
        history.abridged_history()
    } else {
        history.full_history()
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else {
        for m in &messages {
            m.pprint();
        }
    }
    Ok(())
}

async fn run<A: Agent>(agent: A, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut conversation = Conversation::start(agent).await?;

    for prompt in &args.prompts {
        let cancel = CancellationToken::new();
        let reply = repl::prompt_or_interrupt(&mut conversation, prompt, &cancel).await?;
        tracing::debug!(inner = reply.is_inner_dialogue(), "reply received");
    }

    if args.interactive || args.prompts.is_empty() {
        repl::run_repl_loop(&mut conversation).await?;
    }

    print_history(conversation.history(), args.abridged, args.json)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = config::load_default() {
        eprintln!("prompt-playground: config not applied: {e}");
    }
    let args = Args::parse();

    let target = match args.log_file.clone() {
        Some(path) => config::LogTarget::File(path),
        None => config::LogTarget::Stderr,
    };
    let default_filter = if args.verbose { "prompt_engine=debug,playground=debug" } else { "warn" };
    let _guard = config::init_tracing(default_filter, target)?;

    let provider = make_provider(&args.replies);
    match args.agent {
        AgentKind::Tool => {
            let agent = ToolUseAgent::new(provider, vec![ToolDescription::web_search()]);
            run(agent, &args).await
        }
        AgentKind::Chat => {
            let mut agent = ChatAgent::new(provider);
            if let Some(ref system) = args.system {
                agent = agent.with_system_prompt(system.clone());
            }
            run(agent, &args).await
        }
    }
}
