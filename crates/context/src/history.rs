//! Analysis history
//!
//! Append-only log of answered questions. Records cannot be edited or
//! removed once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answered question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub question: String,
    pub answer: String,
    /// Context block that was embedded in the prompt
    pub context: String,
    pub asked_at: DateTime<Utc>,
}

/// Insertion-ordered record log
#[derive(Debug, Clone, Default)]
pub struct AnalysisHistory {
    records: Vec<AnalysisRecord>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, question: String, answer: String, context: String) -> &AnalysisRecord {
        self.records.push(AnalysisRecord {
            question,
            answer,
            context,
            asked_at: Utc::now(),
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut history = AnalysisHistory::new();
        history.append("q1".into(), "a1".into(), "c1".into());
        history.append("q2".into(), "a2".into(), "c2".into());

        let questions: Vec<&str> = history.records().iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["q1", "q2"]);
        assert!(history.records()[0].asked_at <= history.records()[1].asked_at);
        assert_eq!(history.records()[1].answer, "a2");
    }
}
