// Moodle → QML → Moodle round trips through the public API

use qml_moodle::moodle::read_quiz;
use qml_moodle::{
    moodle_to_qml, qml_to_moodle, ConversionError, ConversionSettings, Dialect, IdStrategy,
    QuestionKind, QuestionPolicy,
};

fn quiz(questions: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<quiz>\n{}\n</quiz>\n", questions)
}

fn round_trip(moodle: &str) -> qml_moodle::Question {
    let settings = ConversionSettings::default();
    let qml = moodle_to_qml(moodle, &settings).expect("Moodle → QML should succeed");
    let back = qml_to_moodle(&qml.xml, &settings).expect("QML → Moodle should succeed");

    let mut bank = read_quiz(&back.xml, QuestionPolicy::Abort).expect("output should be a Moodle quiz");
    assert_eq!(bank.questions.len(), 1);
    bank.questions.remove(0)
}

#[test]
fn test_multichoice_round_trip() {
    let moodle = quiz(
        r#"<question type="multichoice">
    <name><text>Capitals</text></name>
    <questiontext format="html"><text><![CDATA[<p>Capital of <b>Italy</b>?</p>]]></text></questiontext>
    <answer fraction="0"><text>Milan</text><feedback><text>Nope</text></feedback></answer>
    <answer fraction="100"><text>Rome</text></answer>
    <answer fraction="0"><text>Naples</text></answer>
    <answer fraction="0"><text>Turin</text></answer>
    <shuffleanswers>0</shuffleanswers>
    <single>true</single>
    <answernumbering>123</answernumbering>
  </question>"#,
    );

    let question = round_trip(&moodle);

    assert_eq!(question.name, "Capitals");
    assert_eq!(question.text, "<p>Capital of <b>Italy</b>?</p>");
    match question.kind {
        QuestionKind::MultiChoice { single, choices } => {
            assert!(single);
            assert_eq!(choices.len(), 4);
            let correct: Vec<&str> = choices
                .iter()
                .filter(|c| c.is_correct())
                .map(|c| c.text.as_str())
                .collect();
            assert_eq!(correct, vec!["Rome"]);
            // Feedback is reset to the fixed vocabulary
            assert_eq!(choices[0].feedback.as_deref(), Some("Incorrect"));
            assert_eq!(choices[1].feedback.as_deref(), Some("Correct"));
        }
        other => panic!("Expected MultiChoice, got {:?}", other),
    }
}

#[test]
fn test_multiple_answer_flag_round_trip() {
    let moodle = quiz(
        r#"<question type="multichoice">
    <name><text>Pick one or more</text></name>
    <questiontext><text>Which?</text></questiontext>
    <answer fraction="100"><text>a</text></answer>
    <answer fraction="0"><text>b</text></answer>
    <single>false</single>
  </question>"#,
    );

    let qml = moodle_to_qml(&moodle, &ConversionSettings::default()).unwrap();
    assert!(qml.xml.contains("<ANSWER QTYPE=\"MR\">"));

    let question = round_trip(&moodle);
    assert!(matches!(question.kind, QuestionKind::MultiChoice { single: false, .. }));
}

#[test]
fn test_truefalse_round_trip() {
    let moodle = quiz(
        r#"<question type="truefalse">
    <name><text>Water</text></name>
    <questiontext><text>Water is wet</text></questiontext>
    <answer fraction="100"><text>true</text></answer>
    <answer fraction="0"><text>false</text></answer>
  </question>"#,
    );

    let qml = moodle_to_qml(&moodle, &ConversionSettings::default()).unwrap();
    assert!(qml.xml.contains("<CONDITION>\"true\"</CONDITION>"));

    let back = qml_to_moodle(&qml.xml, &ConversionSettings::default()).unwrap();
    assert!(back.xml.contains("<answer fraction=\"100\">\n      <text>true</text>"));
    assert!(back.xml.contains("<answer fraction=\"0\">\n      <text>false</text>"));

    let question = round_trip(&moodle);
    assert!(matches!(question.kind, QuestionKind::TrueFalse { answer: true, .. }));
}

#[test]
fn test_shortanswer_round_trip_preserves_answer_bytes() {
    let moodle = quiz(
        r#"<question type="shortanswer">
    <name><text>Greeting</text></name>
    <questiontext><text>Say hello</text></questiontext>
    <answer fraction="100"><text> Ciao, "mondo" &amp; più </text><feedback><text>Bravo</text></feedback></answer>
    <usecase>1</usecase>
  </question>"#,
    );

    let question = round_trip(&moodle);

    assert_eq!(
        question.kind,
        QuestionKind::ShortAnswer {
            answer: " Ciao, \"mondo\" & più ".to_string(),
            feedback: Some("Correct answer".to_string()),
            case_sensitive: false,
        }
    );
}

#[test]
fn test_numerical_round_trip_defaults_tolerance_and_units() {
    let moodle = quiz(
        r#"<question type="numerical">
    <name><text>Speed of light</text></name>
    <questiontext><text>In km/s?</text></questiontext>
    <answer fraction="100"><text>299792</text><tolerance>10</tolerance></answer>
    <units><unit><multiplier>1</multiplier><unit_name>km/s</unit_name></unit></units>
  </question>"#,
    );

    let qml = moodle_to_qml(&moodle, &ConversionSettings::default()).unwrap();
    assert!(qml.xml.contains("<ANSWER QTYPE=\"NUM\"/>"));

    let back = qml_to_moodle(&qml.xml, &ConversionSettings::default()).unwrap();
    assert!(back.xml.contains("<tolerance>0</tolerance>"));
    assert!(back.xml.contains("<units>\n      <unit/>\n    </units>"));

    let question = round_trip(&moodle);
    match question.kind {
        QuestionKind::Numerical { answer, tolerance, units, .. } => {
            assert_eq!(answer, "299792");
            assert_eq!(tolerance, "0");
            assert!(units.is_empty());
        }
        other => panic!("Expected Numerical, got {:?}", other),
    }
}

#[test]
fn test_last_fully_correct_choice_becomes_condition() {
    let moodle = quiz(
        r#"<question type="multichoice">
    <name><text>Two right</text></name>
    <questiontext><text>?</text></questiontext>
    <answer fraction="100"><text>first</text></answer>
    <answer fraction="0"><text>wrong</text></answer>
    <answer fraction="100"><text>second</text></answer>
    <single>true</single>
  </question>"#,
    );
    let settings = ConversionSettings {
        id_strategy: IdStrategy::Counter,
        ..ConversionSettings::default()
    };

    let output = moodle_to_qml(&moodle, &settings).unwrap();

    assert!(output.xml.contains("<CHOICE ID=\"C3\">\n        <CONTENT TYPE=\"text/html\">second</CONTENT>"));
    assert!(output.xml.contains("<CONDITION>\"C3\"</CONDITION>"));
    assert_eq!(output.warnings.len(), 1);

    let question = round_trip(&moodle);
    if let QuestionKind::MultiChoice { choices, .. } = question.kind {
        assert!(!choices[0].is_correct());
        assert!(choices[2].is_correct());
    } else {
        panic!("Expected MultiChoice");
    }
}

#[test]
fn test_essay_rejected_in_both_directions() {
    let moodle = quiz(
        r#"<question type="essay">
    <name><text>Essay</text></name>
    <questiontext><text>Discuss</text></questiontext>
  </question>"#,
    );
    let error = moodle_to_qml(&moodle, &ConversionSettings::default()).unwrap_err();
    assert!(matches!(
        error.root_cause(),
        ConversionError::UnsupportedType { dialect: Dialect::Moodle, found } if found == "essay"
    ));

    let qml = r#"<QML>
  <QUESTION ID="Q1" DESCRIPTION="Essay">
    <CONTENT TYPE="text/html">Discuss</CONTENT>
    <ANSWER QTYPE="ESSAY"/>
    <OUTCOME ID="O1" SCORE="1"><CONDITION>""</CONDITION></OUTCOME>
  </QUESTION>
</QML>"#;
    let error = qml_to_moodle(qml, &ConversionSettings::default()).unwrap_err();
    assert!(matches!(
        error.root_cause(),
        ConversionError::UnsupportedType { dialect: Dialect::Qml, found } if found == "ESSAY"
    ));
}

#[test]
fn test_duplicate_choice_texts_get_unique_ids() {
    let moodle = quiz(
        r#"<question type="multichoice">
    <name><text>Same</text></name>
    <questiontext><text>?</text></questiontext>
    <answer fraction="0"><text>yes</text></answer>
    <answer fraction="100"><text>yes</text></answer>
    <single>true</single>
  </question>
  <question type="multichoice">
    <name><text>Same</text></name>
    <questiontext><text>?</text></questiontext>
    <answer fraction="100"><text>yes</text></answer>
    <single>true</single>
  </question>"#,
    );

    let output = moodle_to_qml(&moodle, &ConversionSettings::default()).unwrap();

    let mut ids: Vec<&str> = output
        .xml
        .match_indices(" ID=\"")
        .map(|(start, _)| {
            let rest = &output.xml[start + 5..];
            &rest[..rest.find('"').unwrap()]
        })
        .collect();
    // Two questions, two outcomes, three choices
    assert_eq!(ids.len(), 7);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 7);

    // Correctness still lands on the second choice of the first question
    let back = qml_to_moodle(&output.xml, &ConversionSettings::default()).unwrap();
    let bank = read_quiz(&back.xml, QuestionPolicy::Abort).unwrap();
    if let QuestionKind::MultiChoice { choices, .. } = &bank.questions[0].kind {
        assert!(!choices[0].is_correct());
        assert!(choices[1].is_correct());
    } else {
        panic!("Expected MultiChoice");
    }
}

#[test]
fn test_skip_policy_drops_unsupported_question() {
    let moodle = quiz(
        r#"<question type="essay">
    <name><text>Essay</text></name>
    <questiontext><text>Discuss</text></questiontext>
  </question>
  <question type="shortanswer">
    <name><text>Capital</text></name>
    <questiontext><text>Capital of France?</text></questiontext>
    <answer fraction="100"><text>Paris</text></answer>
  </question>"#,
    );
    let settings = ConversionSettings {
        question_policy: QuestionPolicy::Skip,
        ..ConversionSettings::default()
    };

    let output = moodle_to_qml(&moodle, &settings).unwrap();

    assert_eq!(output.xml.matches("<QUESTION ").count(), 1);
    assert!(output.xml.contains("<CONDITION>\"Paris\"</CONDITION>"));
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].number, 1);
    assert_eq!(output.warnings[0].question, "Essay");
}

#[test]
fn test_name_with_newline_and_tab_round_trip() {
    let moodle = quiz(
        "<question type=\"shortanswer\">
    <name><text>Line one\nLine\ttwo</text></name>
    <questiontext><text>Capital of France?</text></questiontext>
    <answer fraction=\"100\"><text>Paris</text></answer>
  </question>",
    );

    let qml = moodle_to_qml(&moodle, &ConversionSettings::default()).unwrap();
    assert!(qml.xml.contains("DESCRIPTION=\"Line one&#10;Line&#9;two\""));

    let question = round_trip(&moodle);
    assert_eq!(question.name, "Line one\nLine\ttwo");
}
