//! Moodle quiz writer
//!
//! Emits one `<question>` per record. Settings Moodle needs but QML never
//! carries (answer feedback, shuffling, numbering, case sensitivity,
//! tolerance, units) are filled with fixed defaults from
//! [`ConversionSettings`].

use super::MoodleType;
use crate::errors::Result;
use crate::model::{Choice, Question, QuestionKind, Unit};
use crate::types::{ConversionSettings, FeedbackVocabulary};
use crate::xml::XmlWriter;

/// Prolog of every Moodle document
pub const MOODLE_PROLOG: &str = "<?xml version=\"1.0\" ?>\n";

const HTML: [(&str, &str); 1] = [("format", "html")];

/// Write questions as a pretty-printed Moodle `<quiz>` document
pub fn write_quiz(questions: &[Question], settings: &ConversionSettings) -> Result<String> {
    let mut xml = XmlWriter::with_prolog(MOODLE_PROLOG);
    let feedback = &settings.feedback;

    xml.start("quiz", &[])?;
    for question in questions {
        match &question.kind {
            QuestionKind::MultiChoice { single, choices } => {
                write_multichoice(&mut xml, question, *single, choices, feedback)?
            }
            QuestionKind::TrueFalse {
                answer,
                true_feedback,
                false_feedback,
            } => write_truefalse(
                &mut xml,
                question,
                *answer,
                [true_feedback.as_deref(), false_feedback.as_deref()],
                feedback,
            )?,
            QuestionKind::ShortAnswer {
                answer,
                feedback: answer_feedback,
                case_sensitive,
            } => {
                let answer_feedback = answer_feedback.as_deref().unwrap_or(&feedback.accepted_answer);
                write_shortanswer(&mut xml, question, answer, answer_feedback, *case_sensitive)?
            }
            QuestionKind::Numerical {
                answer,
                feedback: answer_feedback,
                tolerance,
                units,
            } => {
                let answer_feedback = answer_feedback.as_deref().unwrap_or(&feedback.accepted_answer);
                write_numerical(&mut xml, question, answer, answer_feedback, tolerance, units)?
            }
        }
    }
    xml.end("quiz")?;

    xml.finish()
}

// ============================================================================
// PER-TYPE EMITTERS
// ============================================================================

fn write_multichoice(
    xml: &mut XmlWriter,
    question: &Question,
    single: bool,
    choices: &[Choice],
    vocabulary: &FeedbackVocabulary,
) -> Result<()> {
    write_header(xml, MoodleType::MultiChoice, question)?;

    for choice in choices {
        let feedback = choice.feedback.as_deref().unwrap_or(if choice.is_correct() {
            vocabulary.correct.as_str()
        } else {
            vocabulary.incorrect.as_str()
        });
        write_answer(xml, &format_fraction(choice.fraction), &choice.text, None, feedback)?;
    }

    xml.text_element("shuffleanswers", &[], "1")?;
    xml.text_element("single", &[], if single { "true" } else { "false" })?;
    xml.text_element("answernumbering", &[], "abc")?;
    xml.end("question")
}

fn write_truefalse(
    xml: &mut XmlWriter,
    question: &Question,
    answer: bool,
    feedback: [Option<&str>; 2],
    vocabulary: &FeedbackVocabulary,
) -> Result<()> {
    write_header(xml, MoodleType::TrueFalse, question)?;

    for (value, own_feedback) in [true, false].into_iter().zip(feedback) {
        let correct = value == answer;
        let default_feedback = if correct {
            &vocabulary.true_false_correct
        } else {
            &vocabulary.true_false_incorrect
        };
        write_answer(
            xml,
            if correct { "100" } else { "0" },
            if value { "true" } else { "false" },
            None,
            own_feedback.unwrap_or(default_feedback),
        )?;
    }

    xml.end("question")
}

fn write_shortanswer(
    xml: &mut XmlWriter,
    question: &Question,
    answer: &str,
    feedback: &str,
    case_sensitive: bool,
) -> Result<()> {
    write_header(xml, MoodleType::ShortAnswer, question)?;
    write_answer(xml, "100", answer, None, feedback)?;
    xml.text_element("usecase", &[], if case_sensitive { "1" } else { "0" })?;
    xml.end("question")
}

fn write_numerical(
    xml: &mut XmlWriter,
    question: &Question,
    answer: &str,
    feedback: &str,
    tolerance: &str,
    units: &[Unit],
) -> Result<()> {
    write_header(xml, MoodleType::Numerical, question)?;
    write_answer(xml, "100", answer, Some(tolerance), feedback)?;

    xml.start("units", &[])?;
    if units.is_empty() {
        // Placeholder for "no unit"
        xml.empty("unit", &[])?;
    }
    for unit in units {
        xml.start("unit", &[])?;
        xml.text_element("multiplier", &[], &unit.multiplier)?;
        xml.text_element("unit_name", &[], &unit.name)?;
        xml.end("unit")?;
    }
    xml.end("units")?;

    xml.end("question")
}

// ============================================================================
// SHARED PARTS
// ============================================================================

/// Opens `<question>` and writes name, question text and general feedback
fn write_header(xml: &mut XmlWriter, kind: MoodleType, question: &Question) -> Result<()> {
    xml.start("question", &[("type", kind.as_str())])?;
    xml.wrapped_text("name", &[], &question.name)?;
    xml.wrapped_text("questiontext", &HTML, &question.text)?;
    xml.wrapped_text("generalfeedback", &HTML, &question.general_feedback)
}

fn write_answer(
    xml: &mut XmlWriter,
    fraction: &str,
    text: &str,
    tolerance: Option<&str>,
    feedback: &str,
) -> Result<()> {
    xml.start("answer", &[("fraction", fraction)])?;
    xml.text_element("text", &[], text)?;
    if let Some(tolerance) = tolerance {
        xml.text_element("tolerance", &[], tolerance)?;
    }
    xml.wrapped_text("feedback", &[], feedback)?;
    xml.end("answer")
}

/// Whole fractions without decimals (`100`, `0`), others as parsed
fn format_fraction(fraction: f64) -> String {
    if fraction == 0.0 {
        // Also covers -0.0
        "0".to_string()
    } else if fraction.fract() == 0.0 {
        format!("{:.0}", fraction)
    } else {
        fraction.to_string()
    }
}
