//! Consultation receipts: audit records of AI exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PROMPT_SUMMARY_CHARS;

/// A receipt as produced by the assistant, before the store assigns an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewConsultationReceipt {
    pub timestamp: DateTime<Utc>,
    /// Which assistant persona answered (e.g. "dr-echo")
    pub agent_type: String,
    pub prompt_summary: String,
    /// Hex digest of the response text
    pub response_hash: String,
    pub model_version: String,
    pub disclaimer: String,
}

/// An append-only audit record pairing a response digest with metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationReceipt {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub agent_type: String,
    pub prompt_summary: String,
    pub response_hash: String,
    pub model_version: String,
    pub disclaimer: String,
}

impl ConsultationReceipt {
    pub fn from_new(id: String, receipt: NewConsultationReceipt) -> Self {
        Self {
            id,
            timestamp: receipt.timestamp,
            agent_type: receipt.agent_type,
            prompt_summary: receipt.prompt_summary,
            response_hash: receipt.response_hash,
            model_version: receipt.model_version,
            disclaimer: receipt.disclaimer,
        }
    }
}

/// First 80 characters of the prompt, with "..." appended when cut.
pub fn summarize_prompt(prompt: &str) -> String {
    if prompt.chars().count() <= PROMPT_SUMMARY_CHARS {
        return prompt.to_string();
    }
    let head: String = prompt.chars().take(PROMPT_SUMMARY_CHARS).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prompt_kept_verbatim() {
        assert_eq!(summarize_prompt("I have a headache"), "I have a headache");
    }

    #[test]
    fn test_exactly_80_chars_not_truncated() {
        let prompt = "a".repeat(80);
        assert_eq!(summarize_prompt(&prompt), prompt);
    }

    #[test]
    fn test_long_prompt_truncated_with_ellipsis() {
        let prompt = "b".repeat(81);
        let summary = summarize_prompt(&prompt);
        assert_eq!(summary.len(), 83);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let prompt = "é".repeat(100);
        let summary = summarize_prompt(&prompt);
        assert_eq!(summary.chars().count(), 83);
    }
}
