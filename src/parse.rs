use xmlparser::{ElementEnd, EntityDefinition, Token, Tokenizer};

use crate::builder::TreeBuilder;
use crate::document::{Declaration, Document};
use crate::encoding::{decode, sniff};
use crate::engine::{is_whitespace, normalize_newlines};
use crate::entity::{expand_references, normalize_attribute_value, Entities, ExpansionBudget};
use crate::error::Error;
use crate::event::{AttributeData, QName, StartTag};

struct DocumentBuilder<'d> {
    tree: TreeBuilder<'d>,
    entities: Entities,
    budget: ExpansionBudget,
    declaration: Declaration,
    current: Option<StartTag>,
    open: Vec<String>,
    seen_root: bool,
}

impl<'d> DocumentBuilder<'d> {
    fn new(document: &'d mut Document) -> Self {
        let root = document.root();
        DocumentBuilder {
            tree: TreeBuilder::new(document, root),
            entities: Entities::default(),
            budget: ExpansionBudget::default(),
            declaration: Declaration::default(),
            current: None,
            open: Vec::new(),
            seen_root: false,
        }
    }

    fn element(&mut self, prefix: &str, local: &str) -> Result<(), Error> {
        if self.open.is_empty() {
            if self.seen_root {
                return Err(Error::ContentOutsideRoot);
            }
            self.seen_root = true;
        }
        self.current = Some(StartTag {
            name: QName::new(qualified(prefix, local)),
            attributes: Vec::new(),
            empty: false,
        });
        Ok(())
    }

    fn attribute(&mut self, prefix: &str, local: &str, value: &str) -> Result<(), Error> {
        let name = qualified(prefix, local);
        let value = expand_references(
            &normalize_attribute_value(value),
            &self.entities,
            &mut self.budget,
        )?
        .into_owned();
        if let Some(current) = &mut self.current {
            if current.attributes.iter().any(|a| a.qname.full() == name) {
                return Err(Error::DuplicateAttribute(name));
            }
            current.attributes.push(AttributeData::new(name, value));
        }
        Ok(())
    }

    fn open_element(&mut self, empty: bool) -> Result<(), Error> {
        if let Some(mut tag) = self.current.take() {
            tag.empty = empty;
            if !empty {
                self.open.push(tag.name.full().to_string());
            }
            self.tree.start_element(&tag)?;
        }
        Ok(())
    }

    fn close_element(&mut self, prefix: &str, local: &str) -> Result<(), Error> {
        let name = qualified(prefix, local);
        match self.open.pop() {
            Some(open) if open == name => {
                self.tree.end_element();
                Ok(())
            }
            Some(open) => Err(Error::InvalidCloseTag(open, name)),
            None => Err(Error::ContentOutsideRoot),
        }
    }

    fn text(&mut self, text: &str) -> Result<(), Error> {
        if self.open.is_empty() {
            if is_whitespace(text) {
                return Ok(());
            }
            return Err(Error::ContentOutsideRoot);
        }
        let text = normalize_newlines(text);
        let text = expand_references(&text, &self.entities, &mut self.budget)?;
        self.tree.text(&text);
        Ok(())
    }

    fn finish(self) -> Result<Declaration, Error> {
        if let Some(open) = self.open.last() {
            return Err(Error::UnclosedTag(open.clone()));
        }
        if !self.seen_root {
            return Err(Error::NoRootElement);
        }
        Ok(self.declaration)
    }
}

/// ## Parsing
impl Document {
    /// Parse a string into a document.
    ///
    /// Character references, the predefined entities and entities declared
    /// in the internal DTD subset are expanded.
    ///
    /// ```rust
    /// use xotreader::Document;
    ///
    /// let doc = Document::parse("<p>Hello &amp; welcome</p>")?;
    /// let p = doc.document_element().unwrap();
    /// assert_eq!(doc.text_content_str(p), "Hello & welcome");
    /// # Ok::<(), xotreader::Error>(())
    /// ```
    pub fn parse(xml: &str) -> Result<Document, Error> {
        let mut document = Document::new();
        let mut builder = DocumentBuilder::new(&mut document);

        for token in Tokenizer::from(xml) {
            match token? {
                Token::Declaration {
                    version,
                    encoding,
                    standalone,
                    ..
                } => {
                    builder.declaration = Declaration {
                        version: Some(version.as_str().to_string()),
                        encoding: encoding.map(|encoding| encoding.as_str().to_string()),
                        standalone,
                    };
                }
                Token::EntityDeclaration {
                    name, definition, ..
                } => {
                    let value = match definition {
                        EntityDefinition::EntityValue(value) => value.as_str().to_string(),
                        // external entities are never fetched
                        EntityDefinition::ExternalId(_) => String::new(),
                    };
                    builder
                        .entities
                        .entry(name.as_str().to_string())
                        .or_insert(value);
                }
                Token::ElementStart { prefix, local, .. } => {
                    builder.element(prefix.as_str(), local.as_str())?;
                }
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    builder.attribute(prefix.as_str(), local.as_str(), value.as_str())?;
                }
                Token::ElementEnd { end, .. } => match end {
                    ElementEnd::Open => builder.open_element(false)?,
                    ElementEnd::Empty => builder.open_element(true)?,
                    ElementEnd::Close(prefix, local) => {
                        builder.close_element(prefix.as_str(), local.as_str())?
                    }
                },
                Token::Text { text } => builder.text(text.as_str())?,
                Token::Cdata { text, .. } => {
                    if builder.open.is_empty() {
                        return Err(Error::ContentOutsideRoot);
                    }
                    builder.tree.cdata(&normalize_newlines(text.as_str()));
                }
                Token::Comment { text, .. } => {
                    builder.tree.comment(&normalize_newlines(text.as_str()));
                }
                Token::ProcessingInstruction {
                    target, content, ..
                } => {
                    builder
                        .tree
                        .processing_instruction(target.as_str(), content.map(|c| c.as_str()));
                }
                Token::DtdStart { .. } | Token::EmptyDtd { .. } | Token::DtdEnd { .. } => {}
            }
        }

        let declaration = builder.finish()?;
        document.declaration = declaration;
        Ok(document)
    }

    /// Parse bytes into a document, detecting their encoding.
    pub fn parse_bytes(data: &[u8]) -> Result<Document, Error> {
        let encoding = sniff(data, None)?;
        Document::parse(&decode(data, encoding)?)
    }
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{}:{}", prefix, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmlvalue::ValueType;

    #[test]
    fn test_parse_structure() {
        let doc = Document::parse(r#"<a x="1"><b>t</b><!--c--><?pi data?></a>"#).unwrap();
        let a = doc.document_element().unwrap();
        let kinds = doc
            .children(a)
            .map(|child| doc.value_type(child))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ValueType::Element,
                ValueType::Comment,
                ValueType::ProcessingInstruction
            ]
        );
        assert_eq!(doc.qualified_name(a), Some("a".to_string()));
    }

    #[test]
    fn test_parse_declaration() {
        let doc = Document::parse(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><a/>"#)
            .unwrap();
        assert_eq!(doc.declaration().version.as_deref(), Some("1.0"));
        assert_eq!(doc.declaration().encoding.as_deref(), Some("UTF-8"));
        assert_eq!(doc.declaration().standalone, Some(true));
    }

    #[test]
    fn test_parse_declared_entity() {
        let doc = Document::parse(r#"<!DOCTYPE a [<!ENTITY e "E">]><a>x&e;y</a>"#).unwrap();
        let a = doc.document_element().unwrap();
        assert_eq!(doc.text_content_str(a), "xEy");
    }

    #[test]
    fn test_parse_namespaces() {
        let doc = Document::parse(r#"<a xmlns="urn:d" xmlns:x="urn:x"><x:b x:c="1"/></a>"#)
            .unwrap();
        let a = doc.document_element().unwrap();
        let b = doc.first_child(a).unwrap();
        let a_name = doc.element(a).unwrap().name();
        assert_eq!(doc.name_namespace_str(a_name), "urn:d");
        let c = doc.name_ns("c", "urn:x").unwrap();
        assert_eq!(doc.element(b).unwrap().get_attribute(c), Some("1"));
    }

    #[test]
    fn test_parse_crlf() {
        let doc = Document::parse("<a>x\r\ny</a>").unwrap();
        let a = doc.document_element().unwrap();
        assert_eq!(doc.text_content_str(a), "x\ny");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Document::parse("<a></b>"),
            Err(Error::InvalidCloseTag(open, close)) if open == "a" && close == "b"
        ));
        assert!(matches!(
            Document::parse("<a><b/>"),
            Err(Error::UnclosedTag(_)) | Err(Error::Parser(_))
        ));
        assert!(matches!(
            Document::parse("<a>&nope;</a>"),
            Err(Error::UndeclaredEntity(name)) if name == "nope"
        ));
        assert!(Document::parse("<a x='1' x='2'/>").is_err());
    }

    #[test]
    fn test_parse_bytes_latin1() {
        let doc =
            Document::parse_bytes(b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?><a>caf\xe9</a>")
                .unwrap();
        let a = doc.document_element().unwrap();
        assert_eq!(doc.text_content_str(a), "café");
    }
}
