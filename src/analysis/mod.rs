//! Comment analysis pipeline.
//!
//! Builds the instructional prompt around a block of viewer comments,
//! hands it to the model runtime, and parses the free-text reply into
//! themes and content ideas.

mod parser;

pub use parser::{parse_model_reply, FALLBACK_PLACEHOLDER};

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::llm::{LlmError, ModelRunner};
use crate::models::AnalysisResult;

/// Default prompt for comment analysis. The model is asked for two
/// labeled sections with three numbered lines each; the parser depends
/// on that layout.
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"You're a content strategist for a creator. Analyze these viewer comments and provide insights:

COMMENTS:
{comments}

Please provide your response in this exact format:

VIEWER THEMES:
1. [Theme 1]
2. [Theme 2]
3. [Theme 3]

CONTENT IDEAS:
1. [Content idea 1]
2. [Content idea 2]
3. [Content idea 3]

Keep each theme and idea concise but specific. Focus on actionable insights."#;

/// Tiny prompt used to verify the model runtime responds at all.
pub const HEALTH_PROBE_PROMPT: &str = "Say hello";

/// Orchestrates prompt building, model invocation, and reply parsing.
///
/// Stateless between calls; each analysis is an independent invocation
/// of the model runtime.
pub struct Analyzer {
    config: LlmConfig,
    runner: Arc<dyn ModelRunner>,
}

impl Analyzer {
    pub fn new(config: LlmConfig, runner: Arc<dyn ModelRunner>) -> Self {
        Self { config, runner }
    }

    /// Analyze a block of viewer comments.
    ///
    /// The caller is responsible for rejecting empty input; a malformed
    /// model reply degrades to placeholder content rather than erroring.
    pub async fn analyze(&self, comments: &str) -> Result<AnalysisResult, LlmError> {
        let prompt = self.build_prompt(comments);
        info!("analyzing {} chars of comments", comments.len());

        let reply = self.runner.generate(&prompt).await?;
        debug!("model replied with {} chars", reply.len());

        Ok(parse_model_reply(&reply))
    }

    /// Ask the model runtime for a trivial reply to confirm it works.
    pub async fn probe(&self) -> Result<String, LlmError> {
        self.runner.generate(HEALTH_PROBE_PROMPT).await
    }

    /// Whether the underlying runtime looks usable.
    pub fn runtime_available(&self) -> bool {
        self.runner.is_available()
    }

    /// Embed the comments in the configured prompt template.
    fn build_prompt(&self, comments: &str) -> String {
        let truncated = truncate_content(comments, self.config.max_comment_chars);
        self.config.get_analysis_prompt().replace("{comments}", truncated)
    }
}

/// Truncate text to at most `max` bytes on a valid UTF-8 boundary.
fn truncate_content(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
