//! # marquee
//!
//! Terminal chat front-end for the marquee movie assistant. One user line
//! per turn; the assistant answers directly or runs catalog lookups behind
//! the scenes.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use marquee_core::dialogue::{DialogueEngine, EngineConfig, TurnEvent};
use marquee_core::llm::ChatModel;
use marquee_core::catalog::MovieCatalog;
use marquee_core::prompts::system_instruction;
use marquee_core::session::SessionStore;
use marquee_core::wire::WireFormat;
use marquee_llm::{OpenAiChat, RemoteLlmConfig};
use marquee_movies::{StaticCatalog, TmdbCatalog, TmdbConfig};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Chat with a movie assistant that can look up listings and book tickets", long_about = None)]
#[command(version)]
struct Cli {
    /// Model identifier sent to the chat API
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.2)]
    temperature: f32,

    /// Maximum output tokens per model invocation
    #[arg(long, default_value_t = 500)]
    max_tokens: usize,

    /// Wire grammar the model uses to request function calls
    #[arg(long, value_enum, default_value_t = WireArg::Delimited)]
    wire: WireArg,

    /// Maximum chained actions per turn
    #[arg(long, default_value_t = 8)]
    max_rounds: usize,

    /// Use the built-in movie fixtures instead of the TMDB API
    #[arg(long)]
    offline: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum WireArg {
    /// Single JSON object: {"function": ..., "parameters": {...}}
    Json,
    /// [FUNCTION_CALL]name(arg1, arg2)[/FUNCTION_CALL]
    Delimited,
}

impl From<WireArg> for WireFormat {
    fn from(arg: WireArg) -> Self {
        match arg {
            WireArg::Json => WireFormat::Json,
            WireArg::Delimited => WireFormat::Delimited,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let wire_format = WireFormat::from(cli.wire);

    let llm_config = RemoteLlmConfig::from_env("OPENAI_API_KEY", &cli.base_url, &cli.model)
        .context("set OPENAI_API_KEY to your API key")?;
    let model: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(llm_config));

    let catalog: Arc<dyn MovieCatalog> = if cli.offline {
        Arc::new(StaticCatalog::new())
    } else {
        let tmdb = TmdbConfig::from_env("TMDB_API_KEY")
            .context("set TMDB_API_KEY, or pass --offline to use built-in fixtures")?;
        Arc::new(TmdbCatalog::new(tmdb))
    };

    let config = EngineConfig::default()
        .with_wire_format(wire_format)
        .with_temperature(cli.temperature)
        .with_max_tokens(cli.max_tokens)
        .with_max_action_rounds(cli.max_rounds);

    let engine = DialogueEngine::new(model, catalog, config).with_event_sink(Arc::new(render_event));

    let store = SessionStore::new();
    let (_id, session) = store.create(system_instruction(wire_format));

    println!("marquee movie assistant — ask about movies, showtimes, or tickets (/quit to exit)");
    run_chat_loop(&engine, session).await
}

async fn run_chat_loop(
    engine: &DialogueEngine,
    session: Arc<tokio::sync::Mutex<marquee_core::session::Session>>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        // One turn at a time: the session lock is held until the turn
        // completes, chained actions included.
        let mut session = session.lock().await;
        match engine.handle_turn(&mut session, line).await {
            Ok(reply) => println!("marquee> {}", reply.text()),
            Err(err) => eprintln!("error: {err}"),
        }
        drop(session);

        prompt()?;
    }

    Ok(())
}

fn render_event(event: TurnEvent) {
    match event {
        TurnEvent::ActionStarted { name, args } => {
            println!("· calling {}({})", name, args.join(", "));
        }
        TurnEvent::ActionCompleted { name } => {
            println!("· {name} completed");
        }
    }
}

fn prompt() -> Result<()> {
    print!("you> ");
    std::io::stdout().flush()?;
    Ok(())
}
