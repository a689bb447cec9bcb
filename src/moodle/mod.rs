//! Moodle quiz XML dialect
//!
//! A Moodle export is a `<quiz>` holding `<question type="...">` elements.
//! Every text field is wrapped in a `<text>` child, answers carry their score
//! in a `fraction` attribute (0 to 100).
//!
//! - **reader**: `<quiz>` → [`QuestionBank`](crate::model::QuestionBank), dispatching on `type`
//! - **writer**: questions → `<quiz>`, one emitter per question type

pub mod reader;
pub mod writer;

pub use reader::{read_question, read_quiz};
pub use writer::{write_quiz, MOODLE_PROLOG};

/// Values of the Moodle `type` attribute handled by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodleType {
    MultiChoice,
    TrueFalse,
    ShortAnswer,
    Numerical,
}

impl MoodleType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "multichoice" => Some(MoodleType::MultiChoice),
            "truefalse" => Some(MoodleType::TrueFalse),
            "shortanswer" => Some(MoodleType::ShortAnswer),
            "numerical" => Some(MoodleType::Numerical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodleType::MultiChoice => "multichoice",
            MoodleType::TrueFalse => "truefalse",
            MoodleType::ShortAnswer => "shortanswer",
            MoodleType::Numerical => "numerical",
        }
    }
}
