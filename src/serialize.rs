use genawaiter::rc::gen;
use genawaiter::yield_;
use std::io::Write;

use crate::access::NodeEdge;
use crate::document::{Document, Node};
use crate::entity::{serialize_attribute, serialize_text};
use crate::error::Error;
use crate::intern::NamespaceId;
use crate::intern::PrefixId;
use crate::xmlvalue::{Attribute, Element, Prefixes, Value};

/// What a node contributes to serialized XML.
#[derive(Debug, PartialEq)]
pub(crate) enum Output<'a> {
    /// `<foo` or `<ns:foo`
    StartTagOpen(&'a Element),
    /// `>`, or `/>` for an element without children
    StartTagClose { empty: bool },
    /// `</foo>`
    EndTag(&'a Element),
    /// `xmlns:foo="http://example.com"`
    Prefix(PrefixId, NamespaceId),
    /// `foo="bar"`
    Attribute(&'a Attribute),
    Text(&'a str),
    CData(&'a str),
    Comment(&'a str),
    ProcessingInstruction(&'a str, Option<&'a str>),
}

pub(crate) fn gen_outputs(document: &Document, node: Node) -> impl Iterator<Item = Output> + '_ {
    gen!({
        for edge in document.traverse(node) {
            match edge {
                NodeEdge::Start(current) => {
                    for output in gen_edge_start(document, node, current) {
                        yield_!(output);
                    }
                }
                NodeEdge::End(current) => {
                    if let Some(element) = document.element(current) {
                        if document.first_child(current).is_some() {
                            yield_!(Output::EndTag(element));
                        }
                    }
                }
            }
        }
    })
    .into_iter()
}

fn gen_edge_start(document: &Document, top: Node, node: Node) -> impl Iterator<Item = Output> + '_ {
    gen!({
        match document.value(node) {
            Value::Root => {}
            Value::Element(element) => {
                yield_!(Output::StartTagOpen(element));
                // the top element of a fragment declares what it inherits
                if node == top {
                    for (prefix_id, namespace_id) in inherited_prefixes(document, node) {
                        if element.get_namespace(prefix_id).is_none() {
                            yield_!(Output::Prefix(prefix_id, namespace_id));
                        }
                    }
                }
                for (prefix_id, namespace_id) in element.prefixes() {
                    yield_!(Output::Prefix(*prefix_id, *namespace_id));
                }
                for attribute in element.attributes() {
                    yield_!(Output::Attribute(attribute));
                }
                yield_!(Output::StartTagClose {
                    empty: document.first_child(node).is_none()
                });
            }
            Value::Text(text) => yield_!(Output::Text(text.get())),
            Value::CData(text) => yield_!(Output::CData(text.get())),
            Value::Comment(comment) => yield_!(Output::Comment(comment.get())),
            Value::ProcessingInstruction(pi) => {
                yield_!(Output::ProcessingInstruction(pi.target(), pi.data()))
            }
        }
    })
    .into_iter()
}

// Bindings declared on the ancestors of a node, nearest first.
fn inherited_prefixes(document: &Document, node: Node) -> Prefixes {
    let mut prefixes = Prefixes::new();
    for ancestor in document.ancestors(node).skip(1) {
        if let Some(element) = document.element(ancestor) {
            for (prefix_id, namespace_id) in element.prefixes() {
                if !prefixes.iter().any(|(seen, _)| seen == prefix_id) {
                    prefixes.push((*prefix_id, *namespace_id));
                }
            }
        }
    }
    prefixes
}

/// ## Serialization
impl Document {
    /// Write a node and its descendants as XML.
    pub fn serialize(&self, node: Node, w: &mut impl Write) -> Result<(), Error> {
        for output in gen_outputs(self, node) {
            self.render(&output, w)?;
        }
        Ok(())
    }

    /// Serialize a node and its descendants to a string.
    ///
    /// ```rust
    /// use xotreader::Document;
    ///
    /// let doc = Document::parse(r#"<a x="1"><b>t &amp; u</b><c/></a>"#)?;
    /// let a = doc.document_element().unwrap();
    /// assert_eq!(doc.to_string(a)?, r#"<a x="1"><b>t &amp; u</b><c/></a>"#);
    /// # Ok::<(), xotreader::Error>(())
    /// ```
    pub fn to_string(&self, node: Node) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.serialize(node, &mut buf)?;
        String::from_utf8(buf).map_err(|_| Error::Encoding("UTF-8".to_string()))
    }

    /// Serialize the children of a node.
    pub fn inner_xml(&self, node: Node) -> Result<String, Error> {
        let mut buf = Vec::new();
        for child in self.children(node) {
            self.serialize(child, &mut buf)?;
        }
        String::from_utf8(buf).map_err(|_| Error::Encoding("UTF-8".to_string()))
    }

    fn render(&self, output: &Output, w: &mut impl Write) -> Result<(), Error> {
        match output {
            Output::StartTagOpen(element) => {
                write!(w, "<{}", self.qualify(element.prefix(), element.name()))?;
            }
            Output::StartTagClose { empty } => {
                if *empty {
                    write!(w, "/>")?;
                } else {
                    write!(w, ">")?;
                }
            }
            Output::EndTag(element) => {
                write!(w, "</{}>", self.qualify(element.prefix(), element.name()))?;
            }
            Output::Prefix(prefix_id, namespace_id) => {
                let namespace = serialize_attribute(self.namespace_str(*namespace_id));
                if *prefix_id == self.empty_prefix() {
                    write!(w, " xmlns=\"{}\"", namespace)?;
                } else {
                    write!(w, " xmlns:{}=\"{}\"", self.prefix_str(*prefix_id), namespace)?;
                }
            }
            Output::Attribute(attribute) => {
                write!(
                    w,
                    " {}=\"{}\"",
                    self.qualify(attribute.prefix(), attribute.name()),
                    serialize_attribute(attribute.value())
                )?;
            }
            Output::Text(text) => write!(w, "{}", serialize_text(text))?,
            Output::CData(text) => write!(w, "<![CDATA[{}]]>", text)?,
            Output::Comment(text) => write!(w, "<!--{}-->", text)?,
            Output::ProcessingInstruction(target, data) => match data {
                Some(data) => write!(w, "<?{} {}?>", target, data)?,
                None => write!(w, "<?{}?>", target)?,
            },
        }
        Ok(())
    }
}
