//! CLI commands implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::Analyzer;
use crate::config::{load_settings, Settings};
use crate::llm::OllamaRunner;
use crate::models::AnalysisReport;

#[derive(Parser)]
#[command(name = "clens")]
#[command(about = "Viewer comment analysis for content creators")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the analysis web server
    Serve {
        /// Bind address: PORT, HOST, or HOST:PORT
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Analyze a comments file from the terminal
    Analyze {
        /// Path to a .txt or .csv file of viewer comments
        file: PathBuf,
        /// Also print the raw model reply
        #[arg(long)]
        raw: bool,
    },

    /// Check that the model runtime is installed and responding
    Check,
}

/// Parse CLI arguments and dispatch to the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing::debug!(verbose = cli.verbose, "parsed CLI arguments");
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => cmd_serve(&settings, bind.as_deref()).await,
        Commands::Analyze { file, raw } => cmd_analyze(&settings, &file, raw).await,
        Commands::Check => cmd_check(&settings).await,
    }
}

fn build_analyzer(settings: &Settings) -> Analyzer {
    let runner = Arc::new(OllamaRunner::new(&settings.llm));
    Analyzer::new(settings.llm.clone(), runner)
}

/// Start the web server.
async fn cmd_serve(settings: &Settings, bind: Option<&str>) -> anyhow::Result<()> {
    let (host, port) = match bind {
        Some(addr) => parse_bind_address(addr, settings.server.port)?,
        None => (settings.server.host.clone(), settings.server.port),
    };

    println!(
        "{} Starting commentlens server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!(
        "  Model: {} (via {})",
        style(&settings.llm.model).bold(),
        settings.llm.binary
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Analyze a comments file and print the result.
async fn cmd_analyze(settings: &Settings, file: &Path, raw: bool) -> anyhow::Result<()> {
    let comments = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("could not read {}: {}", file.display(), e))?;
    if comments.trim().is_empty() {
        anyhow::bail!("{} appears to be empty", file.display());
    }

    let analyzer = build_analyzer(settings);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Analyzing with {}...", settings.llm.model));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = analyzer.analyze(&comments).await;
    spinner.finish_and_clear();

    let result = result?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string());
    let report = AnalysisReport::new(result, &comments, filename);

    println!(
        "\n{} ({} comment lines)",
        style("Viewer Themes").bold().underlined(),
        report.comment_count
    );
    for (i, theme) in report.result.themes.iter().enumerate() {
        println!("  {}. {}", i + 1, theme);
    }

    println!("\n{}", style("Content Ideas").bold().underlined());
    for (i, idea) in report.result.content_ideas.iter().enumerate() {
        println!("  {}. {}", i + 1, idea);
    }

    if raw {
        println!("\n{}", style("Raw model reply").bold().underlined());
        println!("{}", report.result.raw_response);
    }

    Ok(())
}

/// Check model runtime availability.
async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("\n{}", style("Model Runtime Status").bold());
    println!("{}", "-".repeat(50));

    let analyzer = build_analyzer(settings);

    let binary_status = if analyzer.runtime_available() {
        style("✓ found").green()
    } else {
        style("✗ not found").red()
    };
    println!("  {:<15} {}", settings.llm.binary, binary_status);

    if !analyzer.runtime_available() {
        println!(
            "                  {}",
            style("Install Ollama and ensure it is on PATH").dim()
        );
        anyhow::bail!("model runtime not available");
    }

    match analyzer.probe().await {
        Ok(reply) => {
            println!(
                "  {:<15} {}",
                settings.llm.model,
                style("✓ responding").green()
            );
            let preview: String = reply.chars().take(60).collect();
            println!("                  {}", style(preview).dim());
            Ok(())
        }
        Err(e) => {
            println!(
                "  {:<15} {}",
                settings.llm.model,
                style("✗ not responding").red()
            );
            println!("                  {}", style(e.to_string()).dim());
            anyhow::bail!("model probe failed")
        }
    }
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:<default>
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str, default_port: u16) -> anyhow::Result<(String, u16)> {
    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), default_port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_port_only() {
        assert_eq!(
            parse_bind_address("3030", 8000).unwrap(),
            ("127.0.0.1".to_string(), 3030)
        );
    }

    #[test]
    fn test_parse_bind_host_only() {
        assert_eq!(
            parse_bind_address("0.0.0.0", 8000).unwrap(),
            ("0.0.0.0".to_string(), 8000)
        );
    }

    #[test]
    fn test_parse_bind_host_and_port() {
        assert_eq!(
            parse_bind_address("0.0.0.0:9000", 8000).unwrap(),
            ("0.0.0.0".to_string(), 9000)
        );
    }
}
