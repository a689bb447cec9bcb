//! Document-level translators
//!
//! Each direction is a three-stage pipeline:
//! 1. **Read**: parse the source dialect into [`Question`](crate::model::Question) records
//! 2. **Map**: nothing to do, the records are dialect-agnostic
//! 3. **Write**: emit the target dialect, pretty-printed
//!
//! Warnings from reading and writing are merged into one list and logged.

use log::warn;

use crate::errors::Result;
use crate::model::QuestionBank;
use crate::types::{ConversionOutput, ConversionSettings, ConversionWarning, Dialect, Direction};
use crate::xml::detect_dialect;
use crate::{moodle, qml};

/// Convert a Moodle quiz export to a QML document
pub fn moodle_to_qml(xml: &str, settings: &ConversionSettings) -> Result<ConversionOutput> {
    let bank = moodle::read_quiz(xml, settings.question_policy)?;
    let written = qml::write_document(&bank.questions, settings)?;

    Ok(finish(bank.warnings, written))
}

/// Convert a QML document to a Moodle quiz export
pub fn qml_to_moodle(xml: &str, settings: &ConversionSettings) -> Result<ConversionOutput> {
    let bank = qml::read_document(xml, settings.question_policy)?;
    let written = ConversionOutput {
        xml: moodle::write_quiz(&bank.questions, settings)?,
        warnings: Vec::new(),
    };

    Ok(finish(bank.warnings, written))
}

/// Convert in the given direction
pub fn convert(direction: Direction, xml: &str, settings: &ConversionSettings) -> Result<ConversionOutput> {
    match direction {
        Direction::ToQml => moodle_to_qml(xml, settings),
        Direction::ToMoodle => qml_to_moodle(xml, settings),
    }
}

/// Read a document of either dialect, telling them apart by root element
pub fn read_any(xml: &str, settings: &ConversionSettings) -> Result<(Dialect, QuestionBank)> {
    let dialect = detect_dialect(xml)?;
    let bank = match dialect {
        Dialect::Moodle => moodle::read_quiz(xml, settings.question_policy)?,
        Dialect::Qml => qml::read_document(xml, settings.question_policy)?,
    };
    Ok((dialect, bank))
}

fn finish(mut warnings: Vec<ConversionWarning>, written: ConversionOutput) -> ConversionOutput {
    warnings.extend(written.warnings);
    for warning in &warnings {
        warn!("{}", warning);
    }
    ConversionOutput {
        xml: written.xml,
        warnings,
    }
}
