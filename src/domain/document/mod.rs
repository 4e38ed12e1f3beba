use serde::{Deserialize, Serialize};
use std::fmt;

/// Documents shorter than this are not worth chunking for read aloud
pub const MIN_READ_ALOUD_SENTENCES: usize = 5;

/// Extracted text of an uploaded document, as returned by the learning service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentText {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    /// Brief overview of key points
    #[default]
    Concise,
    /// Detailed explanation with context
    Explanatory,
}

impl SummaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryType::Concise => "concise",
            SummaryType::Explanatory => "explanatory",
        }
    }
}

impl fmt::Display for SummaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request for POST /api/documents/:document_id/summary-read-aloud
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SummaryReadAloudRequest {
    #[serde(default)]
    pub summary_type: SummaryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

/// Count sentence terminators in a block of prose (at least one for non-empty text)
pub fn count_sentences(text: &str) -> u32 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    let pattern = regex::Regex::new(r"[.!?]+(\s|$)").expect("sentence pattern is valid");
    (pattern.find_iter(trimmed).count() as u32).max(1)
}

/// Collapse runs of whitespace so text reads cleanly through a speech engine
pub fn normalize_whitespace(text: &str) -> String {
    let whitespace_pattern = regex::Regex::new(r"\s+").expect("whitespace pattern is valid");
    whitespace_pattern.replace_all(text.trim(), " ").to_string()
}
