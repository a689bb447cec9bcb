//! QML reader
//!
//! Turns `<QUESTION>` elements into [`Question`] records, dispatching on
//! `ANSWER/@QTYPE`. QML has no feedback, case-sensitivity, tolerance or unit
//! fields; the records get empty or default values for them.

use roxmltree::Node;

use super::{unquote_condition, QType};
use crate::errors::{ConversionError, Result};
use crate::model::{Choice, Question, QuestionBank, QuestionKind, FULL_CREDIT};
use crate::moodle::reader::parse_boolean_literal;
use crate::types::{Dialect, QuestionPolicy};
use crate::xml::{collect_questions, get_child, get_children, get_path_text, get_text, parse_document};

/// Read every question of a `<QML>` document
pub fn read_document(xml: &str, policy: QuestionPolicy) -> Result<QuestionBank> {
    let doc = parse_document(xml, Dialect::Qml)?;
    collect_questions(
        get_children(doc.root_element(), "QUESTION"),
        policy,
        question_label,
        read_question,
    )
}

/// Read one `<QUESTION>` element, dispatching on `ANSWER/@QTYPE`
pub fn read_question(node: Node, notes: &mut Vec<String>) -> Result<Question> {
    let answer = get_child(node, "ANSWER").ok_or_else(|| ConversionError::missing("ANSWER"))?;
    let found = answer
        .attribute("QTYPE")
        .ok_or_else(|| ConversionError::missing("ANSWER/@QTYPE"))?;

    let kind = match QType::parse(found) {
        Some(QType::Mc) => read_choices(node, answer, true, notes)?,
        Some(QType::Mr) => read_choices(node, answer, false, notes)?,
        Some(QType::Tf) => read_truefalse(node)?,
        Some(QType::Open) => QuestionKind::ShortAnswer {
            answer: read_condition(node)?,
            feedback: None,
            case_sensitive: false,
        },
        Some(QType::Num) => QuestionKind::Numerical {
            answer: read_condition(node)?,
            feedback: None,
            tolerance: "0".to_string(),
            units: Vec::new(),
        },
        None => {
            return Err(ConversionError::UnsupportedType {
                dialect: Dialect::Qml,
                found: found.to_string(),
            })
        }
    };

    let content = get_child(node, "CONTENT").ok_or_else(|| ConversionError::missing("CONTENT"))?;

    Ok(Question {
        name: node.attribute("DESCRIPTION").unwrap_or_default().to_string(),
        text: get_text(content),
        general_feedback: String::new(),
        kind,
    })
}

fn question_label(node: Node) -> String {
    node.attribute("DESCRIPTION")
        .or_else(|| node.attribute("ID"))
        .unwrap_or("<unnamed QUESTION>")
        .to_string()
}

/// The unquoted `OUTCOME/CONDITION` of the first outcome
fn read_condition(node: Node) -> Result<String> {
    let raw = get_path_text(node, &["OUTCOME", "CONDITION"])
        .ok_or_else(|| ConversionError::missing("OUTCOME/CONDITION"))?;
    Ok(unquote_condition(&raw).to_string())
}

// ============================================================================
// PER-TYPE READERS
// ============================================================================

fn read_choices(node: Node, answer: Node, single: bool, notes: &mut Vec<String>) -> Result<QuestionKind> {
    let correct_id = read_condition(node)?;

    let mut matched = false;
    let mut choices = Vec::new();
    for choice in get_children(answer, "CHOICE") {
        let id = choice
            .attribute("ID")
            .ok_or_else(|| ConversionError::missing("CHOICE/@ID"))?;
        let correct = id == correct_id;
        matched |= correct;

        choices.push(Choice {
            text: get_path_text(choice, &["CONTENT"]).unwrap_or_default(),
            fraction: if correct { FULL_CREDIT } else { 0.0 },
            feedback: None,
        });
    }

    if !matched {
        notes.push(format!("condition {:?} matches no choice", correct_id));
    }

    Ok(QuestionKind::MultiChoice { single, choices })
}

fn read_truefalse(node: Node) -> Result<QuestionKind> {
    let condition = read_condition(node)?;
    let answer = parse_boolean_literal(&condition)
        .ok_or_else(|| ConversionError::invalid("OUTCOME/CONDITION", &condition))?;

    Ok(QuestionKind::TrueFalse {
        answer,
        true_feedback: None,
        false_feedback: None,
    })
}
