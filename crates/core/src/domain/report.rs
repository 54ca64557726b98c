use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Source label for reports produced without an LLM because none was configured or the
/// call failed.
pub const MOCK_SOURCE: &str = "Local Mock Logic";

/// Source label for the rule-driven screening report.
pub const QUANT_SOURCE: &str = "Quant Rules";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub date: NaiveDate,
    /// Markdown rendered as-is by the dashboard.
    pub content: String,
    pub source: String,
}

impl ReportDocument {
    pub fn new(date: NaiveDate, content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            date,
            content: content.into(),
            source: source.into(),
        }
    }
}
