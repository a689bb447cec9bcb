//! XML plumbing shared by both dialects
//!
//! Reading goes through roxmltree, writing through quick-xml's indenting
//! writer. Nothing in here knows about question types.

use std::borrow::Cow;

use log::debug;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use roxmltree::{Document, Node, ParsingOptions};

use crate::errors::{ConversionError, Result};
use crate::model::{Question, QuestionBank};
use crate::types::{ConversionWarning, Dialect, QuestionPolicy};

// ============================================================================
// READING
// ============================================================================

/// Parse a document and check its root element
///
/// DTDs are allowed so that QML files carrying their DOCTYPE line parse; the
/// external DTD itself is never loaded.
pub fn parse_document(xml: &str, dialect: Dialect) -> Result<Document<'_>> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| ConversionError::MalformedInput(format!("XML parse error: {}", e)))?;

    let root = doc.root_element().tag_name().name();
    if root != dialect.root_element() {
        return Err(ConversionError::MalformedInput(format!(
            "Expected <{}> root element for a {} document, found <{}>",
            dialect.root_element(),
            dialect,
            root
        )));
    }

    Ok(doc)
}

/// Which dialect a document is written in, judged by its root element
pub fn detect_dialect(xml: &str) -> Result<Dialect> {
    for dialect in [Dialect::Moodle, Dialect::Qml] {
        if parse_document(xml, dialect).is_ok() {
            return Ok(dialect);
        }
    }
    // Re-parse for a precise error message
    parse_document(xml, Dialect::Moodle).map(|_| Dialect::Moodle)
}

/// Get first child element with given tag
pub fn get_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Get all child elements with given tag, in document order
pub fn get_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Text content of a node; an element without text reads as empty
pub fn get_text(node: Node) -> String {
    node.text().unwrap_or_default().to_string()
}

/// Text of the element reached by following `path` from `node`
pub fn get_path_text(node: Node, path: &[&str]) -> Option<String> {
    let mut current = node;
    for tag in path {
        current = get_child(current, tag)?;
    }
    Some(get_text(current))
}

/// Like [`get_path_text`], failing with `MissingField` on a broken path
pub fn require_path_text(node: Node, path: &[&str]) -> Result<String> {
    get_path_text(node, path).ok_or_else(|| ConversionError::missing(&path.join("/")))
}

/// Read every question node of a document under the given policy
///
/// `label` names a node for error reports; `read` is the dialect's question
/// dispatcher, which may push notes about lossy conversions.
pub(crate) fn collect_questions<'a, 'input: 'a>(
    nodes: impl Iterator<Item = Node<'a, 'input>>,
    policy: QuestionPolicy,
    label: fn(Node) -> String,
    read: fn(Node, &mut Vec<String>) -> Result<Question>,
) -> Result<QuestionBank> {
    let mut bank = QuestionBank::default();

    for (index, node) in nodes.enumerate() {
        let number = index + 1;
        let name = label(node);
        let mut notes = Vec::new();

        match read(node, &mut notes) {
            Ok(question) => {
                debug!("Read question #{} ({:?}) as {}", number, name, question.kind.label());
                bank.warnings.extend(
                    notes
                        .into_iter()
                        .map(|reason| ConversionWarning::new(number, &name, reason)),
                );
                bank.questions.push(question);
            }
            Err(error) => match policy {
                QuestionPolicy::Abort => {
                    return Err(ConversionError::in_question(number, &name, error));
                }
                QuestionPolicy::Skip => {
                    bank.warnings.push(ConversionWarning::new(
                        number,
                        &name,
                        format!("question skipped: {}", error),
                    ));
                }
            },
        }
    }

    Ok(bank)
}

// ============================================================================
// WRITING
// ============================================================================

/// Indenting XML writer producing a `String`
///
/// Elements are indented by two spaces; text stays on the line of its
/// element, and elements without text are written self-closing.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a document with a literal prolog (declaration, DOCTYPE)
    pub fn with_prolog(prolog: &str) -> Self {
        Self {
            writer: Writer::new_with_indent(prolog.as_bytes().to_vec(), b' ', 2),
        }
    }

    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Start(element(name, attributes)))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Empty(element(name, attributes)))
    }

    /// `<name ...>text</name>`, or `<name .../>` for empty text
    pub fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        if text.is_empty() {
            return self.empty(name, attributes);
        }
        self.start(name, attributes)?;
        self.event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
        self.end(name)
    }

    /// `<outer ...><text>..</text></outer>`, Moodle's wrapping of every text field
    pub fn wrapped_text(&mut self, outer: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(outer, attributes)?;
        self.text_element("text", &[], text)?;
        self.end(outer)
    }

    /// Finish the document, with a trailing newline
    pub fn finish(self) -> Result<String> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| ConversionError::Write(e.to_string()))
    }

    fn event(&mut self, event: Event) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| ConversionError::Write(e.to_string()))
    }
}

fn element<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attributes {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }
    start
}

/// Markup escaping plus character references for tab, newline and carriage
/// return, which attribute-value normalization would otherwise turn into spaces
fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped.into_owned();
    }
    escaped
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_whitespace_survives_reparse() {
        let mut writer = XmlWriter::with_prolog("");
        writer
            .empty("QUESTION", &[("DESCRIPTION", "Line one\nLine\ttwo\r & \"three\"")])
            .unwrap();
        let xml = writer.finish().unwrap();

        assert_eq!(
            xml,
            "<QUESTION DESCRIPTION=\"Line one&#10;Line&#9;two&#13; &amp; &quot;three&quot;\"/>\n"
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(
            doc.root_element().attribute("DESCRIPTION"),
            Some("Line one\nLine\ttwo\r & \"three\"")
        );
    }

    #[test]
    fn test_parse_rejects_wrong_root() {
        let result = parse_document("<QML></QML>", Dialect::Moodle);
        assert!(matches!(result, Err(ConversionError::MalformedInput(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        let result = parse_document("<quiz><question></quiz>", Dialect::Moodle);
        assert!(matches!(result, Err(ConversionError::MalformedInput(_))));
    }

    #[test]
    fn test_parse_accepts_doctype() {
        let xml = "<?xml version=\"1.0\" standalone=\"no\"?>\n<!DOCTYPE QML SYSTEM \"QML_V3.dtd\">\n<QML/>";
        assert!(parse_document(xml, Dialect::Qml).is_ok());
    }

    #[test]
    fn test_detect_dialect() {
        assert_eq!(detect_dialect("<quiz/>").unwrap(), Dialect::Moodle);
        assert_eq!(detect_dialect("<QML/>").unwrap(), Dialect::Qml);
        assert!(detect_dialect("<html/>").is_err());
    }

    #[test]
    fn test_path_text() {
        let doc = Document::parse("<q><name><text>Capitals</text></name><empty><text/></empty></q>").unwrap();
        let root = doc.root_element();

        assert_eq!(get_path_text(root, &["name", "text"]), Some("Capitals".to_string()));
        assert_eq!(get_path_text(root, &["empty", "text"]), Some(String::new()));
        assert_eq!(get_path_text(root, &["missing", "text"]), None);

        let error = require_path_text(root, &["questiontext", "text"]).unwrap_err();
        assert!(matches!(error, ConversionError::MissingField(ref f) if f == "questiontext/text"));
    }

    #[test]
    fn test_writer_layout() {
        let mut writer = XmlWriter::with_prolog("<?xml version=\"1.0\" ?>\n");
        writer.start("quiz", &[]).unwrap();
        writer.start("question", &[("type", "shortanswer")]).unwrap();
        writer.wrapped_text("name", &[], "A & B").unwrap();
        writer.text_element("usecase", &[], "").unwrap();
        writer.end("question").unwrap();
        writer.end("quiz").unwrap();
        let xml = writer.finish().unwrap();

        let expected = "<?xml version=\"1.0\" ?>\n\
<quiz>\n  <question type=\"shortanswer\">\n    <name>\n      <text>A &amp; B</text>\n    </name>\n    <usecase/>\n  </question>\n</quiz>\n";
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_writer_keeps_quotes_in_text() {
        let mut writer = XmlWriter::with_prolog("");
        writer.text_element("CONDITION", &[], "\"C1\"").unwrap();
        let xml = writer.finish().unwrap();

        assert_eq!(xml, "<CONDITION>\"C1\"</CONDITION>\n");
    }
}
