//! Moodle XML ⇄ QML question bank converter
//!
//! Converts quiz question banks between Moodle's quiz-export XML and QML
//! (Question Markup Language), in both directions, for four question types:
//! multiple choice (single or multiple correct answer), true/false, short
//! answer and numerical.
//!
//! # Basic Usage
//!
//! ```ignore
//! use qml_moodle::{moodle_to_qml, ConversionSettings};
//!
//! let moodle = std::fs::read_to_string("quiz.xml")?;
//! let output = moodle_to_qml(&moodle, &ConversionSettings::default())?;
//! for warning in &output.warnings {
//!     eprintln!("{}", warning);
//! }
//! std::fs::write("quiz.qml", output.xml)?;
//! ```

pub mod batch;
pub mod convert;
pub mod errors;
pub mod ids;
pub mod model;
pub mod moodle;
pub mod qml;
pub mod types;
pub mod xml;

// Re-export main API
pub use convert::{convert, moodle_to_qml, qml_to_moodle, read_any};
pub use errors::{ConversionError, Result, SettingsError};
pub use model::{Choice, Question, QuestionBank, QuestionKind, Unit};
pub use types::{
    ConversionOutput, ConversionSettings, ConversionWarning, Dialect, Direction, FeedbackVocabulary,
    FilePolicy, IdStrategy, QuestionPolicy,
};
