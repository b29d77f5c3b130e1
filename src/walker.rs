use std::rc::Rc;

use crate::access::NodeEdge;
use crate::document::{Declaration, Document, Node};
use crate::engine::{Engine, Position};
use crate::error::Error;
use crate::event::{AttributeData, Event, NodeEvent, QName, StartTag};
use crate::xmlvalue::Value;

/// Walks a parsed document in document order.
///
/// Elements without children produce no end event, the same as empty
/// elements in a stream.
pub(crate) struct WalkerEngine {
    document: Rc<Document>,
    next: Option<NodeEdge>,
    last: Option<Node>,
}

impl WalkerEngine {
    pub(crate) fn new(document: Rc<Document>) -> Self {
        let next = document.first_child(document.root()).map(NodeEdge::Start);
        WalkerEngine {
            document,
            next,
            last: None,
        }
    }

    fn successor(&self, edge: NodeEdge) -> Option<NodeEdge> {
        let node = match edge {
            NodeEdge::Start(node) => {
                if let Some(child) = self.document.first_child(node) {
                    return Some(NodeEdge::Start(child));
                }
                node
            }
            NodeEdge::End(node) => node,
        };
        if let Some(sibling) = self.document.next_sibling(node) {
            return Some(NodeEdge::Start(sibling));
        }
        let parent = self.document.parent(node)?;
        if parent == self.document.root() {
            None
        } else {
            Some(NodeEdge::End(parent))
        }
    }

    fn start_event(&self, node: Node) -> Option<NodeEvent> {
        let document = &self.document;
        let event = match document.value(node) {
            Value::Element(element) => {
                let mut attributes = Vec::new();
                for (prefix_id, namespace_id) in element.prefixes() {
                    let prefix = document.prefix_str(*prefix_id);
                    let name = if prefix.is_empty() {
                        "xmlns".to_string()
                    } else {
                        format!("xmlns:{}", prefix)
                    };
                    let value = document.namespace_str(*namespace_id).to_string();
                    attributes.push(AttributeData::new(name, value));
                }
                for attribute in element.attributes() {
                    let name = document.qualify(attribute.prefix(), attribute.name());
                    attributes.push(AttributeData::new(name, attribute.value().to_string()));
                }
                Event::StartElement(StartTag {
                    name: QName::new(document.qualify(element.prefix(), element.name())),
                    attributes,
                    empty: document.first_child(node).is_none(),
                })
            }
            Value::Text(text) => Event::Text(text.get().to_string()),
            Value::CData(text) => Event::CData(text.get().to_string()),
            Value::Comment(comment) => Event::Comment(comment.get().to_string()),
            Value::ProcessingInstruction(pi) => Event::ProcessingInstruction {
                target: pi.target().to_string(),
                data: pi.data().map(|data| data.to_string()),
            },
            Value::Root => return None,
        };
        Some(NodeEvent::from_node(event, node))
    }

    fn end_event(&self, node: Node) -> NodeEvent {
        let name = self.document.qualified_name(node).unwrap_or_default();
        NodeEvent::from_node(Event::EndElement(QName::new(name)), node)
    }
}

impl Engine for WalkerEngine {
    fn next_event(&mut self) -> Result<Option<NodeEvent>, Error> {
        while let Some(edge) = self.next.take() {
            self.next = self.successor(edge);
            match edge {
                NodeEdge::Start(node) => {
                    self.last = Some(node);
                    if let Some(event) = self.start_event(node) {
                        return Ok(Some(event));
                    }
                }
                NodeEdge::End(node) => {
                    if self.document.is_element(node) {
                        self.last = Some(node);
                        return Ok(Some(self.end_event(node)));
                    }
                }
            }
        }
        Ok(None)
    }

    fn position(&self) -> Position {
        Position::default()
    }

    fn declaration(&self) -> Option<&Declaration> {
        Some(self.document.declaration())
    }

    fn encoding(&self) -> Option<&str> {
        self.document.declaration().encoding.as_deref()
    }

    fn document(&self) -> Option<&Rc<Document>> {
        Some(&self.document)
    }

    fn next_sibling(&mut self) -> Result<Option<NodeEvent>, Error> {
        let Some(last) = self.last else {
            return Ok(None);
        };
        let Some(sibling) = self.document.next_sibling(last) else {
            return Ok(None);
        };
        self.next = self.successor(NodeEdge::Start(sibling));
        self.last = Some(sibling);
        Ok(self.start_event(sibling))
    }
}
