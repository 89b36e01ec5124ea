//! Web server exposing the comment analysis API.
//!
//! Endpoints:
//! - `GET /` service banner
//! - `GET /api/health` model runtime probe
//! - `POST /api/analyze-text` analyze comments from JSON
//! - `POST /api/analyze-comments` analyze comments from a .txt/.csv upload

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Settings;
use crate::llm::OllamaRunner;

/// Shared state for the web server.
///
/// Requests share nothing beyond the analyzer itself; every analysis is
/// an independent subprocess invocation.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let runner = Arc::new(OllamaRunner::new(&settings.llm));
        Self {
            analyzer: Arc::new(Analyzer::new(settings.llm.clone(), runner)),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
