use std::rc::Rc;

use insta::assert_snapshot;

use xotreader::{Document, NodeType, ReadState, Reader};

fn walk(xml: &str) -> String {
    let document = Rc::new(Document::parse(xml).unwrap());
    let mut reader = Reader::walker(document);
    let mut lines = Vec::new();
    while reader.advance().unwrap() {
        let mut line = format!(
            "{}{:?} {}",
            "  ".repeat(reader.depth()),
            reader.node_type(),
            reader.name().unwrap_or("")
        );
        while reader.move_to_next_attribute() {
            line.push_str(&format!(" {}={:?}", reader.name().unwrap(), reader.value().unwrap()));
        }
        lines.push(line);
    }
    lines.join("\n")
}

#[test]
fn test_walk() {
    assert_snapshot!(walk(r#"<a x="1" xmlns:p="urn:p"><p:b>t</p:b><c/><!--n--></a>"#), @r###"
    Element a xmlns:p="urn:p" x="1"
      Element p:b
        Text #text
      EndElement p:b
      Element c
      Comment #comment
    EndElement a
    "###);
}

#[test]
fn test_walker_namespaces() {
    let document = Rc::new(Document::parse(r#"<a xmlns="urn:d"><b/></a>"#).unwrap());
    let mut reader = Reader::walker(document);
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.name(), Some("b"));
    assert_eq!(reader.namespace_uri(), Some("urn:d"));
    assert!(reader.is_empty_element());
}

#[test]
fn test_skip_to_next_sibling() {
    let document = Rc::new(Document::parse("<r><a><x/></a><b>t</b><c/></r>").unwrap());
    let mut reader = Reader::walker(document);
    // from the start this is a plain advance
    assert!(reader.skip_to_next_sibling().unwrap());
    assert_eq!(reader.name(), Some("r"));
    reader.advance().unwrap();
    assert_eq!(reader.name(), Some("a"));
    assert!(reader.skip_to_next_sibling().unwrap());
    assert_eq!(reader.name(), Some("b"));
    assert_eq!(reader.depth(), 1);
    assert!(reader.skip_to_next_sibling().unwrap());
    assert_eq!(reader.name(), Some("c"));
    // no following sibling: stay put
    assert!(!reader.skip_to_next_sibling().unwrap());
    assert_eq!(reader.name(), Some("c"));
    assert_eq!(reader.read_state(), ReadState::Interactive);
    assert!(reader.advance().unwrap());
    assert_eq!(reader.node_type(), NodeType::EndElement);
    assert_eq!(reader.name(), Some("r"));
    assert_eq!(reader.depth(), 0);
    assert!(!reader.advance().unwrap());
    assert!(!reader.skip_to_next_sibling().unwrap());
}

#[test]
fn test_skip_to_next_sibling_from_text() {
    let document = Rc::new(Document::parse("<r><a>t<i/></a><b/></r>").unwrap());
    let mut reader = Reader::walker(document);
    reader.advance().unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.node_type(), NodeType::Text);
    assert!(reader.skip_to_next_sibling().unwrap());
    assert_eq!(reader.name(), Some("i"));
    assert_eq!(reader.depth(), 2);
    assert!(reader.advance().unwrap());
    assert_eq!(reader.node_type(), NodeType::EndElement);
    assert_eq!(reader.name(), Some("a"));
    assert_eq!(reader.depth(), 1);
}

#[test]
fn test_walker_declaration() {
    let document =
        Rc::new(Document::parse(r#"<?xml version="1.0" encoding="UTF-8"?><a/>"#).unwrap());
    let mut reader = Reader::walker(document);
    reader.advance().unwrap();
    assert_eq!(reader.xml_version(), Some("1.0"));
    assert_eq!(reader.encoding(), Some("UTF-8"));
    assert_eq!(reader.line_number(), 1);
}

#[test]
fn test_walker_close_keeps_document() {
    let document = Rc::new(Document::parse("<a/>").unwrap());
    let mut reader = Reader::walker(Rc::clone(&document));
    reader.advance().unwrap();
    reader.close().unwrap();
    assert_eq!(Rc::strong_count(&document), 1);
    assert!(document.document_element().is_some());
}
