//! Dialect-agnostic question records
//!
//! Both dialect readers produce [`Question`] values and both dialect writers
//! consume them. Correctness lives here in one form only: the Moodle fraction
//! of each choice (QML conditions are turned into fractions on read and back
//! into conditions on write).

use serde::Serialize;

use crate::types::ConversionWarning;

/// Moodle fraction of a fully correct answer
pub const FULL_CREDIT: f64 = 100.0;

/// One question of a bank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    /// Display label (Moodle `name`, QML `DESCRIPTION`)
    pub name: String,

    /// HTML body text
    pub text: String,

    /// HTML general feedback, often empty
    pub general_feedback: String,

    pub kind: QuestionKind,
}

/// Per-type payload of a question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple choice; `single` selects exactly-one-correct semantics
    MultiChoice { single: bool, choices: Vec<Choice> },

    /// True/false; `answer` is the correct value
    TrueFalse {
        answer: bool,
        true_feedback: Option<String>,
        false_feedback: Option<String>,
    },

    /// Free text answer compared against one accepted literal
    ShortAnswer {
        answer: String,
        feedback: Option<String>,
        case_sensitive: bool,
    },

    /// Numeric answer; `answer` and `tolerance` are kept as written
    Numerical {
        answer: String,
        feedback: Option<String>,
        tolerance: String,
        units: Vec<Unit>,
    },
}

impl QuestionKind {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultiChoice { single: true, .. } => "multichoice (single)",
            QuestionKind::MultiChoice { single: false, .. } => "multichoice (multiple)",
            QuestionKind::TrueFalse { .. } => "truefalse",
            QuestionKind::ShortAnswer { .. } => "shortanswer",
            QuestionKind::Numerical { .. } => "numerical",
        }
    }
}

/// One choice of a multichoice question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub text: String,

    /// Moodle score weight, 0 to 100
    pub fraction: f64,

    /// `None` when the source carried no feedback
    pub feedback: Option<String>,
}

impl Choice {
    pub fn is_correct(&self) -> bool {
        self.fraction == FULL_CREDIT
    }
}

/// Unit accepted by a numerical question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub name: String,
    pub multiplier: String,
}

/// Questions read from one document, with the problems met on the way
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
    pub warnings: Vec<ConversionWarning>,
}
