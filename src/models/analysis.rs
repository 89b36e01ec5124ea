//! Analysis result models.

use serde::{Deserialize, Serialize};

/// Outcome of an analysis run.
///
/// Parsing never fails: a malformed model reply degrades to placeholder
/// content, so `Success` is currently the only state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Success,
}

/// Structured result extracted from a model reply.
///
/// `themes` and `content_ideas` each hold at most three entries, in the
/// order they appeared in the reply. A section that yielded nothing is
/// replaced by a single placeholder entry rather than an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Unmodified reply text from the model.
    pub raw_response: String,
    /// Recurring viewer themes (up to three).
    pub themes: Vec<String>,
    /// Suggested content ideas (up to three).
    pub content_ideas: Vec<String>,
    pub status: AnalysisStatus,
}

/// Analysis result plus caller-supplied provenance, as returned to API
/// and CLI consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Original filename when the comments came from an upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Number of comment lines submitted.
    pub comment_count: usize,
}

impl AnalysisReport {
    /// Wrap a result with provenance derived from the input text.
    pub fn new(result: AnalysisResult, comments: &str, filename: Option<String>) -> Self {
        Self {
            result,
            filename,
            comment_count: comments.lines().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AnalysisStatus::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }

    #[test]
    fn test_report_flattens_result() {
        let result = AnalysisResult {
            raw_response: "raw".to_string(),
            themes: vec!["a".to_string()],
            content_ideas: vec!["b".to_string()],
            status: AnalysisStatus::Success,
        };
        let report = AnalysisReport::new(result, "one\ntwo\nthree", Some("c.txt".to_string()));
        assert_eq!(report.comment_count, 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["raw_response"], "raw");
        assert_eq!(json["themes"][0], "a");
        assert_eq!(json["content_ideas"][0], "b");
        assert_eq!(json["status"], "success");
        assert_eq!(json["filename"], "c.txt");
        assert_eq!(json["comment_count"], 3);
    }

    #[test]
    fn test_report_omits_missing_filename() {
        let result = AnalysisResult {
            raw_response: String::new(),
            themes: vec![],
            content_ideas: vec![],
            status: AnalysisStatus::Success,
        };
        let report = AnalysisReport::new(result, "just one line", None);
        assert_eq!(report.comment_count, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("filename").is_none());
    }
}
