//! CLI entry point for Vox.
//!
//! This binary provides the `vox` command with subcommands for starting the
//! HTTP server, routing utterances interactively from stdin, and checking
//! the configuration.

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vox_agent::{ConversationMemory, LlmClient, LlmClientConfig, Responder, fallback_exchange};
use vox_core::{IntentRouter, RouteOutcome};
use vox_web::{WebServer, default_system_prompt};

mod config;

use config::CliConfig;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Vox — a voice-assistant backend.
#[derive(Parser)]
#[command(
    name = "vox",
    version,
    about = "Vox — voice-assistant backend",
    long_about = "A voice-assistant backend that routes utterances to local automation \
                  capabilities and falls back to a language model for conversation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve,

    /// Route utterances from stdin, for local testing.
    Repl,

    /// Show the resolved configuration and capability set.
    Status,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => cmd_serve().await,
        Commands::Repl => cmd_repl().await,
        Commands::Status => cmd_status(),
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolve the LLM configuration: environment first, `vox.toml` model as a
/// fallback when `VOX_MODEL` is unset.
fn build_llm_config(config: &CliConfig) -> vox_agent::Result<LlmClientConfig> {
    let mut llm = LlmClientConfig::from_env()?;
    if std::env::var_os("VOX_MODEL").is_none() {
        if let Some(model) = &config.model {
            llm = llm.with_model(model);
        }
    }
    Ok(llm)
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve() -> Result<()> {
    init_tracing("info");

    info!("starting vox");

    let config = CliConfig::load();

    let llm_config = build_llm_config(&config).context(
        "no LLM configured; set GROQ_API_KEY (or OPENAI_API_KEY / ANTHROPIC_API_KEY)",
    )?;
    let responder: Arc<dyn Responder> =
        Arc::new(LlmClient::new(llm_config).context("failed to create LLM client")?);

    let capabilities = vox_skills::standard_registry();
    info!(capabilities = capabilities.count(), "capability registry ready");

    let server = WebServer::new(
        config.web_config(),
        capabilities,
        responder,
        config.system_prompt.clone(),
    );

    info!(addr = %server.addr(), "vox listening");
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: repl
// ---------------------------------------------------------------------------

async fn cmd_repl() -> Result<()> {
    init_tracing("warn");

    let config = CliConfig::load();
    let router = IntentRouter::new(vox_skills::standard_registry());

    // The fallback is optional here: without an API key the REPL still
    // exercises every rule-handled path.
    let responder = match build_llm_config(&config).and_then(LlmClient::new) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("(fallback disabled: {e})");
            None
        }
    };

    let system_prompt = config
        .system_prompt
        .clone()
        .unwrap_or_else(default_system_prompt);
    let mut memory = ConversationMemory::new(system_prompt);

    println!();
    println!("  Vox v{}", env!("CARGO_PKG_VERSION"));
    println!("  Type an utterance, 'reset' to clear memory, or 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        let utterance = line.trim();

        if utterance.is_empty() {
            continue;
        }
        if utterance == "quit" || utterance == "exit" {
            break;
        }
        if utterance == "reset" {
            memory.reset();
            println!("Conversation memory cleared.");
            continue;
        }

        match router.route(utterance).await {
            RouteOutcome::Handled(response) => println!("{response}"),
            RouteOutcome::Unhandled => match &responder {
                Some(llm) => match fallback_exchange(&mut memory, llm, utterance).await {
                    Ok(response) => println!("{response}"),
                    Err(e) => eprintln!("fallback failed: {e}"),
                },
                None => println!("No rule matched, and no language model is configured."),
            },
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

fn cmd_status() -> Result<()> {
    let config = CliConfig::load();
    let web = config.web_config();
    let capabilities = vox_skills::standard_registry();

    println!("vox v{}", env!("CARGO_PKG_VERSION"));
    println!("bind: {}:{}", web.bind_addr, web.port);

    match build_llm_config(&config) {
        Ok(llm) => println!("fallback model: {}", llm.model),
        Err(e) => println!("fallback: unavailable ({e})"),
    }

    println!("capabilities ({}):", capabilities.count());
    for info in capabilities.list() {
        println!("  {:<16} {}", info.name, info.description);
    }

    Ok(())
}
