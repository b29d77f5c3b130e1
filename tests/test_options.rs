use rstest::rstest;

use xotreader::{Document, Error, NodeType, ParserOptions, Reader, ReaderConfig};

const WITH_ENTITY: &str = r#"<!DOCTYPE a [<!ENTITY e "E">]><a>x&e;y</a>"#;

fn nodes(xml: &str, options: ParserOptions) -> Vec<(NodeType, String, Option<String>)> {
    let config = ReaderConfig::default().with_options(options);
    let mut reader = Reader::from_str(xml, config).unwrap();
    let mut nodes = Vec::new();
    while reader.advance().unwrap() {
        nodes.push((
            reader.node_type(),
            reader.name().unwrap_or_default().to_string(),
            reader.value().map(String::from),
        ));
    }
    nodes
}

#[test]
fn test_entity_reference_nodes() {
    let nodes = nodes(WITH_ENTITY, ParserOptions::empty());
    assert_eq!(
        nodes,
        vec![
            (NodeType::DocumentType, "a".to_string(), None),
            (NodeType::Element, "a".to_string(), None),
            (NodeType::Text, "#text".to_string(), Some("x".to_string())),
            (NodeType::EntityReference, "e".to_string(), None),
            (NodeType::Text, "#text".to_string(), Some("y".to_string())),
            (NodeType::EndElement, "a".to_string(), None),
        ]
    );
}

#[test]
fn test_substitute_entities() {
    let nodes = nodes(WITH_ENTITY, ParserOptions::SUBSTITUTE_ENTITIES);
    assert_eq!(nodes.len(), 4);
    assert_eq!(
        nodes[2],
        (NodeType::Text, "#text".to_string(), Some("xEy".to_string()))
    );
}

#[test]
fn test_character_references_always_expanded() {
    let nodes = nodes("<a>&#65;&#x42;&lt;&amp;</a>", ParserOptions::empty());
    assert_eq!(
        nodes[1],
        (NodeType::Text, "#text".to_string(), Some("AB<&".to_string()))
    );
}

#[rstest]
#[case("<a>&nope;</a>")]
#[case(r#"<a x="&nope;"/>"#)]
fn test_undeclared_entity(#[case] xml: &str) {
    let mut reader = Reader::from_str(xml, ReaderConfig::default()).unwrap();
    let result = loop {
        match reader.advance() {
            Ok(true) => continue,
            other => break other,
        }
    };
    assert!(matches!(result, Err(Error::UndeclaredEntity(name)) if name == "nope"));
}

#[test]
fn test_default_attributes() {
    let xml = r#"<!DOCTYPE a [<!ATTLIST a y CDATA "d" z CDATA #FIXED "f">]><a x="1" z="f"/>"#;

    let config = ReaderConfig::default().with_options(ParserOptions::DEFAULT_ATTRIBUTES);
    let mut reader = Reader::from_str(xml, config).unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.attribute_count(), 3);
    assert_eq!(reader.attribute("y"), Some("d"));
    assert!(reader.move_to_attribute("y"));
    assert!(reader.is_default());
    assert!(reader.move_to_attribute("z"));
    assert!(!reader.is_default());

    let mut reader = Reader::from_str(xml, ReaderConfig::default()).unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.attribute_count(), 2);
    assert_eq!(reader.attribute("y"), None);
}

#[test]
fn test_recorded_options() {
    let options = ParserOptions::LOAD_EXTERNAL_SUBSET | ParserOptions::VALIDATE;
    let xml = r#"<!DOCTYPE a SYSTEM "a.dtd"><a/>"#;
    let nodes = nodes(xml, options);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].0, NodeType::Element);
}

#[test]
fn test_entity_in_entity() {
    let xml = r#"<!DOCTYPE a [<!ENTITY inner "I"><!ENTITY outer "[&inner;]">]><a>&outer;</a>"#;
    let nodes = nodes(xml, ParserOptions::SUBSTITUTE_ENTITIES);
    assert_eq!(nodes[2].2.as_deref(), Some("[I]"));
}

fn read_to_failure(xml: &str, config: ReaderConfig) -> Result<bool, Error> {
    let mut reader = Reader::from_str(xml, config).unwrap();
    loop {
        match reader.advance() {
            Ok(true) => continue,
            other => break other,
        }
    }
}

// Each level refers ten times to the level below it.
fn nested_entities(levels: usize) -> String {
    let mut subset = String::from(r#"<!ENTITY l0 "lol">"#);
    for level in 1..=levels {
        let value = format!("&l{};", level - 1).repeat(10);
        subset.push_str(&format!(r#"<!ENTITY l{} "{}">"#, level, value));
    }
    format!(
        r#"<!DOCTYPE a [{}]><a x="&l{};">&l{};</a>"#,
        subset, levels, levels
    )
}

#[rstest]
#[case(ParserOptions::empty())]
#[case(ParserOptions::SUBSTITUTE_ENTITIES)]
fn test_entity_explosion_fails(#[case] options: ParserOptions) {
    let xml = nested_entities(7);
    let result = read_to_failure(&xml, ReaderConfig::default().with_options(options));
    assert!(matches!(result, Err(Error::InvalidEntity(_))));
    assert!(matches!(Document::parse(&xml), Err(Error::InvalidEntity(_))));
}

#[test]
fn test_moderate_nesting_within_limit() {
    let xml = nested_entities(2);
    let config = ReaderConfig::default().with_options(ParserOptions::SUBSTITUTE_ENTITIES);
    let mut reader = Reader::from_str(&xml, config).unwrap();
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.attribute("x").map(str::len), Some(300));
    reader.advance().unwrap();
    assert_eq!(reader.value().map(str::len), Some(300));
}

#[test]
fn test_expansion_limit_spans_document() {
    let xml = r#"<!DOCTYPE a [<!ENTITY e "E">]><a x="&e;">&e;</a>"#;
    let config = ReaderConfig::default().with_max_entity_expansions(1);
    assert!(matches!(
        read_to_failure(xml, config),
        Err(Error::InvalidEntity(name)) if name == "e"
    ));
    let config = ReaderConfig::default().with_max_entity_expansions(2);
    assert!(matches!(read_to_failure(xml, config), Ok(false)));
}

#[test]
fn test_recursive_entity() {
    let xml = r#"<!DOCTYPE a [<!ENTITY loop "&loop;">]><a>&loop;</a>"#;
    let mut reader = Reader::from_str(xml, ReaderConfig::default()).unwrap();
    let result = loop {
        match reader.advance() {
            Ok(true) => continue,
            other => break other,
        }
    };
    assert!(matches!(result, Err(Error::InvalidEntity(_))));
}
