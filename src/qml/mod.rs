//! QML (Question Markup Language) dialect
//!
//! A QML document is a `<QML>` holding `<QUESTION>` elements. The answer kind
//! sits in `ANSWER/@QTYPE`, and correctness is a quoted expression in
//! `OUTCOME/CONDITION`: a choice ID for MC/MR, `"true"`/`"false"` for TF, the
//! accepted literal for OPEN/NUM.
//!
//! - **reader**: `<QML>` → [`QuestionBank`](crate::model::QuestionBank), dispatching on `QTYPE`
//! - **writer**: questions → `<QML>`, synthesizing question, outcome and choice IDs

pub mod reader;
pub mod writer;

pub use reader::{read_document, read_question};
pub use writer::{write_document, QML_PROLOG};

/// Values of `ANSWER/@QTYPE` handled by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QType {
    /// Multiple choice, one correct answer
    Mc,
    /// Multiple choice, several correct answers
    Mr,
    /// True/false
    Tf,
    /// Short free-text answer
    Open,
    /// Numeric answer
    Num,
}

impl QType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MC" => Some(QType::Mc),
            "MR" => Some(QType::Mr),
            "TF" => Some(QType::Tf),
            "OPEN" => Some(QType::Open),
            "NUM" => Some(QType::Num),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QType::Mc => "MC",
            QType::Mr => "MR",
            QType::Tf => "TF",
            QType::Open => "OPEN",
            QType::Num => "NUM",
        }
    }
}

/// Wrap a reference or literal in the quotes `OUTCOME/CONDITION` expects
pub fn quote_condition(value: &str) -> String {
    format!("\"{}\"", value)
}

/// Value of a condition: outer whitespace and one pair of quotes removed
pub fn unquote_condition(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}
