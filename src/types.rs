//! Public API types
//!
//! Conversion settings, the result of a conversion and the small enums shared
//! by both translation pipelines.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::SettingsError;

// ============================================================================
// DIALECTS AND DIRECTIONS
// ============================================================================

/// One of the two XML vocabularies handled by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// Moodle quiz export, rooted at `<quiz>`
    Moodle,
    /// Question Markup Language, rooted at `<QML>`
    Qml,
}

impl Dialect {
    /// Name of the document root element
    pub fn root_element(&self) -> &'static str {
        match self {
            Dialect::Moodle => "quiz",
            Dialect::Qml => "QML",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Moodle => write!(f, "Moodle"),
            Dialect::Qml => write!(f, "QML"),
        }
    }
}

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Moodle XML → QML
    ToQml,
    /// QML → Moodle XML
    ToMoodle,
}

impl Direction {
    pub fn source(&self) -> Dialect {
        match self {
            Direction::ToQml => Dialect::Moodle,
            Direction::ToMoodle => Dialect::Qml,
        }
    }

    pub fn target(&self) -> Dialect {
        match self {
            Direction::ToQml => Dialect::Qml,
            Direction::ToMoodle => Dialect::Moodle,
        }
    }

    /// File extension of source documents in batch mode
    pub fn source_extension(&self) -> &'static str {
        match self {
            Direction::ToQml => "xml",
            Direction::ToMoodle => "qml",
        }
    }

    /// Extension appended to a source path to name its output
    pub fn target_extension(&self) -> &'static str {
        match self {
            Direction::ToQml => "qml",
            Direction::ToMoodle => "xml",
        }
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

/// How QML identifiers are synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Number taken from the SHA-256 of the source text; stable across runs
    #[default]
    Digest,
    /// Per-document counter; depends on question order
    Counter,
}

/// What a failing question does to its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionPolicy {
    /// The whole document fails
    #[default]
    Abort,
    /// The question is dropped and reported as a warning
    Skip,
}

/// What a failing file does to a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilePolicy {
    /// Log the failure and go on with the next file
    #[default]
    Continue,
    /// Stop the batch at the first failure
    Abort,
}

/// Feedback strings written into Moodle answers
///
/// QML carries no feedback, so every Moodle answer produced from QML gets one
/// of these fixed strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackVocabulary {
    /// Multichoice answer at fraction 100
    pub correct: String,
    /// Multichoice answer at fraction 0
    pub incorrect: String,
    /// True/false answer matching the correct value
    pub true_false_correct: String,
    /// True/false answer not matching the correct value
    pub true_false_incorrect: String,
    /// The accepted answer of a short-answer or numerical question
    pub accepted_answer: String,
}

impl FeedbackVocabulary {
    /// English feedback throughout
    pub fn english() -> Self {
        Self {
            correct: "Correct".to_string(),
            incorrect: "Incorrect".to_string(),
            true_false_correct: "True".to_string(),
            true_false_incorrect: "False".to_string(),
            accepted_answer: "Correct answer".to_string(),
        }
    }

    /// English feedback with Italian true/false strings
    pub fn italian_true_false() -> Self {
        Self {
            true_false_correct: "Vero".to_string(),
            true_false_incorrect: "Falso".to_string(),
            ..Self::english()
        }
    }
}

impl Default for FeedbackVocabulary {
    fn default() -> Self {
        Self::italian_true_false()
    }
}

/// Configuration options for conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionSettings {
    /// Identifier synthesis for QML output
    pub id_strategy: IdStrategy,

    /// `TOPIC` attribute of generated QML questions
    pub topic: String,

    /// `STATUS` attribute of generated QML questions
    pub status: String,

    /// Feedback strings for generated Moodle answers
    pub feedback: FeedbackVocabulary,

    pub question_policy: QuestionPolicy,

    pub file_policy: FilePolicy,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Digest,
            topic: "converted".to_string(),
            status: "Normal".to_string(),
            feedback: FeedbackVocabulary::default(),
            question_policy: QuestionPolicy::Abort,
            file_policy: FilePolicy::Continue,
        }
    }
}

impl ConversionSettings {
    /// Parse settings from YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, SettingsError> {
        let yaml = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Result of converting one document
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The converted document, pretty-printed
    pub xml: String,

    /// Data-integrity problems that did not stop the conversion
    pub warnings: Vec<ConversionWarning>,
}

/// A question that converted with losses, or was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    /// 1-based position of the question in its document
    pub number: usize,

    /// Display name of the question
    pub question: String,

    /// Human-readable explanation
    pub reason: String,
}

impl ConversionWarning {
    pub fn new(number: usize, question: &str, reason: impl Into<String>) -> Self {
        Self {
            number,
            question: question.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "question #{} ({:?}): {}", self.number, self.question, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ConversionSettings::default();
        assert_eq!(settings.id_strategy, IdStrategy::Digest);
        assert_eq!(settings.topic, "converted");
        assert_eq!(settings.status, "Normal");
        assert_eq!(settings.feedback.true_false_correct, "Vero");
        assert_eq!(settings.feedback.correct, "Correct");
        assert_eq!(settings.question_policy, QuestionPolicy::Abort);
        assert_eq!(settings.file_policy, FilePolicy::Continue);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "id_strategy: counter\nquestion_policy: skip\nfeedback:\n  true_false_correct: Right\n";
        let settings = ConversionSettings::from_yaml_str(yaml).unwrap();

        assert_eq!(settings.id_strategy, IdStrategy::Counter);
        assert_eq!(settings.question_policy, QuestionPolicy::Skip);
        assert_eq!(settings.feedback.true_false_correct, "Right");
        // Untouched keys fall back to the vocabulary defaults
        assert_eq!(settings.feedback.true_false_incorrect, "Falso");
        assert_eq!(settings.topic, "converted");
    }

    #[test]
    fn test_settings_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "topic: chemistry\nfile_policy: abort\n").unwrap();

        let result = ConversionSettings::from_yaml_file(&path);
        assert!(result.is_ok());
        let settings = result.unwrap();

        assert_eq!(settings.topic, "chemistry");
        assert_eq!(settings.file_policy, FilePolicy::Abort);
        assert_eq!(settings.status, "Normal");
    }

    #[test]
    fn test_missing_settings_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        match ConversionSettings::from_yaml_file(&path) {
            Err(SettingsError::Read { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected SettingsError::Read, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_setting_rejected() {
        assert!(ConversionSettings::from_yaml_str("colour: blue\n").is_err());
    }

    #[test]
    fn test_direction_extensions() {
        assert_eq!(Direction::ToMoodle.source_extension(), "qml");
        assert_eq!(Direction::ToMoodle.target_extension(), "xml");
        assert_eq!(Direction::ToQml.source(), Dialect::Moodle);
        assert_eq!(Direction::ToQml.target().root_element(), "QML");
    }
}
