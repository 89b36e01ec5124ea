//! Data models shared across the CLI and web server.

mod analysis;

pub use analysis::{AnalysisReport, AnalysisResult, AnalysisStatus};
