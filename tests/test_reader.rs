use insta::assert_snapshot;
use rstest::rstest;

use xotreader::{Error, NodeType, ReadState, Reader, ReaderConfig};

fn trace(xml: &str) -> String {
    let mut reader = Reader::from_str(xml, ReaderConfig::default()).unwrap();
    let mut lines = Vec::new();
    while reader.advance().unwrap() {
        let mut line = format!(
            "{}{:?} {}",
            "  ".repeat(reader.depth()),
            reader.node_type(),
            reader.name().unwrap_or("")
        );
        if let Some(value) = reader.value() {
            line.push_str(&format!(" = {:?}", value));
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[test]
fn test_trace() {
    assert_snapshot!(trace(r#"<a x="1"><b>t</b></a>"#), @r###"
    Element a
      Element b
        Text #text = "t"
      EndElement b
    EndElement a
    "###);
}

#[test]
fn test_trace_misc() {
    assert_snapshot!(trace(r#"<?xml version="1.0"?><!--pre--><a><![CDATA[<x>]]><?pi some data?><e/></a>"#), @r###"
    Comment #comment = "pre"
    Element a
      CData #cdata-section = "<x>"
      ProcessingInstruction pi = "some data"
      Element e
    EndElement a
    "###);
}

#[test]
fn test_states() {
    let mut reader = Reader::from_str("<a/>", ReaderConfig::default()).unwrap();
    assert_eq!(reader.read_state(), ReadState::Initial);
    assert_eq!(reader.node_type(), NodeType::None);
    assert_eq!(reader.xml_version(), None);
    assert!(reader.advance().unwrap());
    assert_eq!(reader.read_state(), ReadState::Interactive);
    assert!(!reader.advance().unwrap());
    assert_eq!(reader.read_state(), ReadState::EndOfFile);
    assert!(!reader.advance().unwrap());
    // the last node stays queryable
    assert_eq!(reader.node_type(), NodeType::Element);
    assert_eq!(reader.name(), Some("a"));
}

#[test]
fn test_mismatched_end_tag() {
    let mut reader = Reader::from_str("<a><b></a>", ReaderConfig::default()).unwrap();
    assert!(reader.advance().unwrap());
    assert!(reader.advance().unwrap());
    assert!(matches!(
        reader.advance(),
        Err(Error::InvalidCloseTag(open, close)) if open == "b" && close == "a"
    ));
    assert_eq!(reader.read_state(), ReadState::Error);
    assert_eq!(reader.node_type(), NodeType::None);
    assert_eq!(reader.name(), None);
    assert_eq!(reader.depth(), 0);
    assert!(matches!(
        reader.advance(),
        Err(Error::InvalidState(ReadState::Error))
    ));
}

#[rstest]
#[case("<a/><b/>")]
#[case("<a/>text")]
#[case("text<a/>")]
#[case("<!-- only a comment -->")]
fn test_not_well_formed(#[case] xml: &str) {
    let mut reader = Reader::from_str(xml, ReaderConfig::default()).unwrap();
    let result = loop {
        match reader.advance() {
            Ok(true) => continue,
            other => break other,
        }
    };
    assert!(result.is_err());
    assert_eq!(reader.read_state(), ReadState::Error);
}

#[test]
fn test_close() {
    let mut reader = Reader::from_str("<a><b/></a>", ReaderConfig::default()).unwrap();
    assert!(reader.advance().unwrap());
    reader.close().unwrap();
    assert_eq!(reader.read_state(), ReadState::Closed);
    assert_eq!(reader.node_type(), NodeType::None);
    assert_eq!(reader.depth(), 0);
    assert!(matches!(reader.advance(), Err(Error::Closed)));
    assert!(matches!(reader.skip(), Err(Error::Closed)));
    reader.close().unwrap();
}

#[test]
fn test_skip() {
    let mut reader =
        Reader::from_str("<a><b><c/><c>x</c></b><d/></a>", ReaderConfig::default()).unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.name(), Some("b"));
    assert!(reader.skip().unwrap());
    assert_eq!(reader.name(), Some("d"));
    assert_eq!(reader.depth(), 1);
    // an empty element has nothing to skip
    assert!(reader.skip().unwrap());
    assert_eq!(reader.node_type(), NodeType::EndElement);
    assert_eq!(reader.name(), Some("a"));
}

#[test]
fn test_skip_to_next_sibling_needs_walker() {
    let mut reader = Reader::from_str("<a><b/><c/></a>", ReaderConfig::default()).unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert!(matches!(
        reader.skip_to_next_sibling(),
        Err(Error::UnsupportedOperation(_))
    ));
    assert_eq!(reader.read_state(), ReadState::Interactive);
    assert_eq!(reader.name(), Some("b"));
    assert!(reader.advance().unwrap());
    assert_eq!(reader.name(), Some("c"));
}

#[test]
fn test_whitespace() {
    let xml = r#"<a> <b xml:space="preserve"> <c xml:space="default"> </c></b></a>"#;
    let mut reader = Reader::from_str(xml, ReaderConfig::default()).unwrap();
    let mut types = Vec::new();
    while reader.advance().unwrap() {
        types.push(reader.node_type());
    }
    assert_eq!(
        types,
        vec![
            NodeType::Element,
            NodeType::Whitespace,
            NodeType::Element,
            NodeType::SignificantWhitespace,
            NodeType::Element,
            NodeType::Whitespace,
            NodeType::EndElement,
            NodeType::EndElement,
            NodeType::EndElement,
        ]
    );
}

#[test]
fn test_has_value() {
    let mut reader =
        Reader::from_str("<a>t<!--c--><?p?><b/></a>", ReaderConfig::default()).unwrap();
    let mut seen = Vec::new();
    while reader.advance().unwrap() {
        seen.push((reader.node_type(), reader.has_value()));
    }
    assert_eq!(
        seen,
        vec![
            (NodeType::Element, false),
            (NodeType::Text, true),
            (NodeType::Comment, true),
            (NodeType::ProcessingInstruction, true),
            (NodeType::Element, false),
            (NodeType::EndElement, false),
        ]
    );
}

#[test]
fn test_declaration() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a/>"#;
    let mut reader = Reader::from_str(xml, ReaderConfig::default()).unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.xml_version(), Some("1.0"));
    assert_eq!(reader.encoding(), Some("UTF-8"));
    assert_eq!(reader.standalone(), Some(true));
    assert_eq!(reader.quote_char(), '"');
    assert!(reader.normalization());
}

#[test]
fn test_default_version() {
    let mut reader = Reader::from_str("<a/>", ReaderConfig::default()).unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.xml_version(), Some("1.0"));
    assert_eq!(reader.standalone(), None);
    assert_eq!(reader.encoding(), Some("UTF-8"));
}

#[test]
fn test_inherited_properties() {
    let xml = r#"<a xml:lang="en" xml:base="http://example.com/"><b xml:lang="nl"/><c/></a>"#;
    let config = ReaderConfig::default().with_base_uri("file:///doc.xml");
    let mut reader = Reader::from_str(xml, config).unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.xml_lang(), Some("en"));
    assert_eq!(reader.base_uri(), Some("http://example.com/"));
    reader.advance().unwrap();
    assert_eq!(reader.xml_lang(), Some("nl"));
    reader.advance().unwrap();
    assert_eq!(reader.name(), Some("c"));
    assert_eq!(reader.xml_lang(), Some("en"));
}

#[test]
fn test_base_uri_from_config() {
    let config = ReaderConfig::default().with_base_uri("file:///doc.xml");
    let mut reader = Reader::from_str("<a/>", config).unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.base_uri(), Some("file:///doc.xml"));
}

#[test]
fn test_position() {
    let mut reader = Reader::from_str("<a>\n<b/>\n</a>", ReaderConfig::default()).unwrap();
    assert_eq!(reader.line_number(), 1);
    reader.advance().unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.name(), Some("b"));
    assert!(reader.line_number() >= 2);
    assert!(reader.byte_consumed() >= 8);
}

#[test]
fn test_newlines_normalized() {
    let mut reader = Reader::from_str("<a>x\r\ny\rz</a>", ReaderConfig::default()).unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.value(), Some("x\ny\nz"));
}

#[test]
fn test_drop_without_close() {
    let mut reader = Reader::from_str("<a><b/></a>", ReaderConfig::default()).unwrap();
    reader.advance().unwrap();
    drop(reader);
}
