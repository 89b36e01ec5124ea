//! Free-text reply parser.
//!
//! The model is asked for two labeled sections of three numbered lines
//! each; this scans the reply line by line and collects whatever matches
//! that layout. Deliberately brittle: only the exact `1.`/`2.`/`3.`
//! prefixes are recognized, and a deviating reply degrades to a
//! placeholder instead of failing the request.

use crate::models::{AnalysisResult, AnalysisStatus};

/// Substituted when a section yields no parsed items.
pub const FALLBACK_PLACEHOLDER: &str = "AI analysis completed - check raw response";

/// Section marker for the themes list.
const THEMES_MARKER: &str = "VIEWER THEMES:";
/// Section marker for the content ideas list.
const IDEAS_MARKER: &str = "CONTENT IDEAS:";

/// Numbered-item prefixes the parser recognizes.
const ITEM_PREFIXES: [&str; 3] = ["1.", "2.", "3."];

/// Maximum items collected per section.
const MAX_ITEMS: usize = 3;

/// Accumulation target while scanning the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Themes,
    Ideas,
}

/// Parse a raw model reply into themes and content ideas.
///
/// Never fails: unrecognized lines are dropped, and a section with no
/// items comes back as a single placeholder entry. The raw reply is
/// preserved verbatim in the result.
pub fn parse_model_reply(raw: &str) -> AnalysisResult {
    let mut themes: Vec<String> = Vec::new();
    let mut ideas: Vec<String> = Vec::new();
    let mut section = Section::None;

    for line in raw.lines() {
        let line = line.trim();
        let upper = line.to_uppercase();

        // A line carrying a marker is consumed as pure marker, even if
        // it also contains item text
        if upper.contains(THEMES_MARKER) {
            section = Section::Themes;
            continue;
        }
        if upper.contains(IDEAS_MARKER) {
            section = Section::Ideas;
            continue;
        }
        if line.is_empty() {
            continue;
        }

        let Some(item) = strip_item_prefix(line) else {
            continue;
        };
        let target = match section {
            Section::Themes => &mut themes,
            Section::Ideas => &mut ideas,
            Section::None => continue,
        };
        if target.len() < MAX_ITEMS {
            target.push(item.to_string());
        }
    }

    if themes.is_empty() {
        themes.push(FALLBACK_PLACEHOLDER.to_string());
    }
    if ideas.is_empty() {
        ideas.push(FALLBACK_PLACEHOLDER.to_string());
    }

    AnalysisResult {
        raw_response: raw.to_string(),
        themes,
        content_ideas: ideas,
        status: AnalysisStatus::Success,
    }
}

/// Strip a recognized `1.`/`2.`/`3.` prefix, returning the trimmed rest.
fn strip_item_prefix(line: &str) -> Option<&str> {
    ITEM_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .map(str::trim)
}
