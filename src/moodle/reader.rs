//! Moodle quiz reader
//!
//! Turns `<question>` elements into [`Question`] records. The `type`
//! attribute selects one of four per-type readers; anything else is
//! `UnsupportedType`. Category markers (`type="category"`) are not questions
//! and are passed over.

use log::debug;
use roxmltree::Node;

use super::MoodleType;
use crate::errors::{ConversionError, Result};
use crate::model::{Choice, Question, QuestionBank, QuestionKind, Unit, FULL_CREDIT};
use crate::types::{Dialect, QuestionPolicy};
use crate::xml::{
    collect_questions, get_child, get_children, get_path_text, get_text, parse_document,
    require_path_text,
};

const CATEGORY: &str = "category";

/// Read every question of a Moodle `<quiz>` document
pub fn read_quiz(xml: &str, policy: QuestionPolicy) -> Result<QuestionBank> {
    let doc = parse_document(xml, Dialect::Moodle)?;

    let questions = get_children(doc.root_element(), "question").filter(|node| {
        let is_category = node.attribute("type") == Some(CATEGORY);
        if is_category {
            debug!(
                "Passing over category marker {:?}",
                get_path_text(*node, &["category", "text"]).unwrap_or_default()
            );
        }
        !is_category
    });

    collect_questions(questions, policy, question_label, read_question)
}

/// Read one `<question>` element, dispatching on its `type` attribute
pub fn read_question(node: Node, notes: &mut Vec<String>) -> Result<Question> {
    let found = node.attribute("type").unwrap_or_default();

    let kind = match MoodleType::parse(found) {
        Some(MoodleType::MultiChoice) => read_multichoice(node)?,
        Some(MoodleType::TrueFalse) => read_truefalse(node)?,
        Some(MoodleType::ShortAnswer) => read_shortanswer(node, notes)?,
        Some(MoodleType::Numerical) => read_numerical(node, notes)?,
        None => {
            return Err(ConversionError::UnsupportedType {
                dialect: Dialect::Moodle,
                found: found.to_string(),
            })
        }
    };

    Ok(Question {
        name: require_path_text(node, &["name", "text"])?,
        text: require_path_text(node, &["questiontext", "text"])?,
        general_feedback: get_path_text(node, &["generalfeedback", "text"]).unwrap_or_default(),
        kind,
    })
}

fn question_label(node: Node) -> String {
    get_path_text(node, &["name", "text"])
        .unwrap_or_else(|| format!("<{} question>", node.attribute("type").unwrap_or("untyped")))
}

// ============================================================================
// PER-TYPE READERS
// ============================================================================

fn read_multichoice(node: Node) -> Result<QuestionKind> {
    let single = get_child(node, "single")
        .map(get_text)
        .ok_or_else(|| ConversionError::missing("single"))?;
    let single = parse_flag("single", &single)?;

    let choices = read_answers(node)?
        .into_iter()
        .map(|answer| Choice {
            text: answer.text,
            fraction: answer.fraction,
            feedback: answer.feedback,
        })
        .collect();

    Ok(QuestionKind::MultiChoice { single, choices })
}

fn read_truefalse(node: Node) -> Result<QuestionKind> {
    let answers = read_answers(node)?;

    let correct = last_correct(&answers)
        .ok_or_else(|| ConversionError::missing("truefalse answer with fraction 100"))?;
    let answer = parse_boolean_literal(&correct.text)
        .ok_or_else(|| ConversionError::invalid("truefalse answer text", &correct.text))?;

    let feedback_for = |value: bool| {
        answers
            .iter()
            .find(|a| parse_boolean_literal(&a.text) == Some(value))
            .and_then(|a| a.feedback.clone())
    };

    Ok(QuestionKind::TrueFalse {
        answer,
        true_feedback: feedback_for(true),
        false_feedback: feedback_for(false),
    })
}

fn read_shortanswer(node: Node, notes: &mut Vec<String>) -> Result<QuestionKind> {
    let answers = read_answers(node)?;
    let accepted = accepted_answer(&answers, notes)?;

    let case_sensitive = match get_child(node, "usecase") {
        Some(usecase) => parse_flag("usecase", &get_text(usecase))?,
        None => false,
    };

    Ok(QuestionKind::ShortAnswer {
        answer: accepted.text.clone(),
        feedback: accepted.feedback.clone(),
        case_sensitive,
    })
}

fn read_numerical(node: Node, notes: &mut Vec<String>) -> Result<QuestionKind> {
    let answers = read_answers(node)?;
    let accepted = accepted_answer(&answers, notes)?;

    let units = get_child(node, "units")
        .map(|units| {
            get_children(units, "unit")
                .filter_map(|unit| {
                    let name = get_path_text(unit, &["unit_name"])?;
                    if name.is_empty() {
                        return None;
                    }
                    Some(Unit {
                        name,
                        multiplier: get_path_text(unit, &["multiplier"])
                            .unwrap_or_else(|| "1".to_string()),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(QuestionKind::Numerical {
        answer: accepted.text.clone(),
        feedback: accepted.feedback.clone(),
        tolerance: accepted.tolerance.clone().unwrap_or_else(|| "0".to_string()),
        units,
    })
}

// ============================================================================
// ANSWERS
// ============================================================================

/// One `<answer>` element as written in the export
#[derive(Debug)]
struct MoodleAnswer {
    text: String,
    fraction: f64,
    feedback: Option<String>,
    tolerance: Option<String>,
}

fn read_answers(node: Node) -> Result<Vec<MoodleAnswer>> {
    get_children(node, "answer").map(read_answer).collect()
}

fn read_answer(node: Node) -> Result<MoodleAnswer> {
    let raw = node
        .attribute("fraction")
        .ok_or_else(|| ConversionError::missing("answer/@fraction"))?;

    Ok(MoodleAnswer {
        text: get_path_text(node, &["text"]).unwrap_or_default(),
        fraction: parse_fraction(raw)?,
        feedback: get_path_text(node, &["feedback", "text"]),
        tolerance: get_path_text(node, &["tolerance"]),
    })
}

/// Last answer at full credit; later answers win
fn last_correct(answers: &[MoodleAnswer]) -> Option<&MoodleAnswer> {
    answers.iter().rev().find(|a| a.fraction == FULL_CREDIT)
}

/// The single accepted answer of a shortanswer or numerical question
fn accepted_answer<'a>(answers: &'a [MoodleAnswer], notes: &mut Vec<String>) -> Result<&'a MoodleAnswer> {
    let accepted = last_correct(answers)
        .ok_or_else(|| ConversionError::missing("answer with fraction 100"))?;

    let dropped = answers.len() - 1;
    if dropped > 0 {
        notes.push(format!(
            "{} other answer(s) dropped, only {:?} is kept",
            dropped, accepted.text
        ));
    }

    Ok(accepted)
}

fn parse_fraction(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|fraction| fraction.is_finite())
        .ok_or_else(|| ConversionError::invalid("answer/@fraction", raw))
}

/// `true`/`1` or `false`/`0` in any ASCII case; an empty flag is unset
fn parse_flag(field: &str, raw: &str) -> Result<bool> {
    match raw.trim() {
        "" | "0" => Ok(false),
        "1" => Ok(true),
        flag => parse_boolean_literal(flag).ok_or_else(|| ConversionError::invalid(field, raw)),
    }
}

/// `true`/`false` in any ASCII case
pub(crate) fn parse_boolean_literal(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
