//! commentlens - viewer comment analysis for content creators.
//!
//! Feeds blocks of viewer comments to a locally running LLM (via the
//! Ollama CLI) and extracts recurring themes and content ideas from
//! the reply.

mod analysis;
mod cli;
mod config;
mod llm;
mod models;
mod server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "commentlens=info"
    } else {
        "commentlens=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
