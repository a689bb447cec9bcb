//! QML writer
//!
//! Emits one `<QUESTION>` per record, with identifiers from a per-document
//! [`IdAllocator`]. The correct answer is encoded in `OUTCOME/CONDITION`,
//! which holds a single reference; a multichoice question with several fully
//! correct choices keeps only the last one and reports the loss.

use log::debug;

use super::{quote_condition, QType};
use crate::errors::Result;
use crate::ids::{IdAllocator, QuestionIds};
use crate::model::{Choice, Question, QuestionKind};
use crate::types::{ConversionOutput, ConversionSettings, ConversionWarning};
use crate::xml::XmlWriter;

/// Prolog of every QML document; external tools match on it literally
pub const QML_PROLOG: &str =
    "<?xml version=\"1.0\" standalone=\"no\"?>\n<!DOCTYPE QML SYSTEM \"QML_V3.dtd\">\n";

const HTML: [(&str, &str); 1] = [("TYPE", "text/html")];

/// Write questions as a pretty-printed `<QML>` document
pub fn write_document(questions: &[Question], settings: &ConversionSettings) -> Result<ConversionOutput> {
    let mut xml = XmlWriter::with_prolog(QML_PROLOG);
    let mut ids = IdAllocator::new(settings.id_strategy);
    let mut warnings = Vec::new();

    xml.start("QML", &[])?;
    for (index, question) in questions.iter().enumerate() {
        let mut notes = Vec::new();
        write_question(&mut xml, &mut ids, question, settings, &mut notes)?;
        warnings.extend(
            notes
                .into_iter()
                .map(|reason| ConversionWarning::new(index + 1, &question.name, reason)),
        );
    }
    xml.end("QML")?;

    Ok(ConversionOutput {
        xml: xml.finish()?,
        warnings,
    })
}

fn write_question(
    xml: &mut XmlWriter,
    ids: &mut IdAllocator,
    question: &Question,
    settings: &ConversionSettings,
    notes: &mut Vec<String>,
) -> Result<()> {
    let QuestionIds {
        question: question_id,
        outcome: outcome_id,
    } = ids.question_ids(&question.name);

    xml.start(
        "QUESTION",
        &[
            ("ID", question_id.as_str()),
            ("DESCRIPTION", question.name.as_str()),
            ("TOPIC", settings.topic.as_str()),
            ("STATUS", settings.status.as_str()),
        ],
    )?;
    xml.text_element("CONTENT", &HTML, &question.text)?;

    if !question.general_feedback.is_empty() {
        debug!("General feedback of {:?} has no QML counterpart, dropped", question.name);
    }

    let condition = match &question.kind {
        QuestionKind::MultiChoice { single, choices } => {
            write_choices(xml, ids, *single, choices, notes)?
        }
        QuestionKind::TrueFalse { answer, .. } => {
            xml.empty("ANSWER", &[("QTYPE", QType::Tf.as_str())])?;
            answer.to_string()
        }
        QuestionKind::ShortAnswer { answer, .. } => {
            xml.empty("ANSWER", &[("QTYPE", QType::Open.as_str())])?;
            answer.clone()
        }
        QuestionKind::Numerical {
            answer,
            tolerance,
            units,
            ..
        } => {
            if tolerance.as_str() != "0" || !units.is_empty() {
                debug!(
                    "Tolerance {:?} and {} unit(s) of {:?} have no QML counterpart, dropped",
                    tolerance,
                    units.len(),
                    question.name
                );
            }
            xml.empty("ANSWER", &[("QTYPE", QType::Num.as_str())])?;
            answer.clone()
        }
    };

    xml.start("OUTCOME", &[("ID", outcome_id.as_str()), ("SCORE", "1")])?;
    xml.text_element("CONDITION", &[], &quote_condition(&condition))?;
    xml.end("OUTCOME")?;

    xml.end("QUESTION")
}

/// Writes `ANSWER` with its choices; returns the ID the condition refers to
fn write_choices(
    xml: &mut XmlWriter,
    ids: &mut IdAllocator,
    single: bool,
    choices: &[Choice],
    notes: &mut Vec<String>,
) -> Result<String> {
    let qtype = if single { QType::Mc } else { QType::Mr };
    xml.start("ANSWER", &[("QTYPE", qtype.as_str())])?;

    let mut correct: Vec<(String, &str)> = Vec::new();
    for choice in choices {
        let id = ids.choice_id(&choice.text);
        xml.start("CHOICE", &[("ID", id.as_str())])?;
        xml.text_element("CONTENT", &HTML, &choice.text)?;
        xml.end("CHOICE")?;

        if choice.is_correct() {
            correct.push((id, choice.text.as_str()));
        }
    }
    xml.end("ANSWER")?;

    let condition = match correct.as_slice() {
        [] => {
            notes.push("no choice has fraction 100, condition left empty".to_string());
            String::new()
        }
        [(id, _)] => id.clone(),
        [.., (id, text)] => {
            notes.push(format!(
                "{} choices have fraction 100, only the last one ({:?}) is encoded in the condition",
                correct.len(),
                text
            ));
            id.clone()
        }
    };

    Ok(condition)
}
