use std::rc::Rc;

use crate::builder::TreeBuilder;
use crate::document::{Document, Node};
use crate::error::Error;
use crate::event::{Event, NodeEvent};
use crate::nodetype::NodeType;
use crate::reader::{Cursor, Reader};

/// A materialized subtree.
///
/// The subtree shares ownership of the document it lives in, so it stays
/// valid however the reader that produced it moves afterwards, and after
/// that reader is closed or dropped.
#[derive(Clone)]
pub struct Subtree {
    document: Rc<Document>,
    root: Node,
}

impl Subtree {
    /// The document holding the subtree.
    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    /// The top node of the subtree.
    pub fn root(&self) -> Node {
        self.root
    }

    /// The qualified name of the top node, if it is an element.
    pub fn name(&self) -> Option<String> {
        self.document.qualified_name(self.root)
    }

    /// The local name of the top node, if it is an element.
    pub fn local_name(&self) -> Option<&str> {
        let element = self.document.element(self.root)?;
        Some(self.document.local_name_str(element.name()))
    }

    /// The children of the top node.
    pub fn children(&self) -> impl Iterator<Item = Node> + '_ {
        self.document.children(self.root)
    }

    /// The value of an attribute in no namespace on the top node.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        let name_id = self.document.name(local_name)?;
        self.document.element(self.root)?.get_attribute(name_id)
    }

    /// The concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        self.document.text_content_str(self.root)
    }

    /// Serialize the subtree.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        self.document.to_string(self.root)
    }
}

impl std::fmt::Debug for Subtree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subtree")
            .field("root", &self.root)
            .field("name", &self.name())
            .finish()
    }
}

/// ## Materialization
impl<'a> Reader<'a> {
    /// Materialize the subtree rooted at the current node.
    ///
    /// In attribute mode the owning element is materialized. The reader
    /// reads ahead as far as needed; later calls to
    /// [`advance`](Reader::advance) replay what was read. Returns `None`
    /// when not positioned on a node, on an end tag, or on a document type
    /// declaration. A well-formedness error found while reading ahead puts
    /// the reader in the error state and also returns `None`.
    ///
    /// ```rust
    /// use xotreader::{Reader, ReaderConfig};
    ///
    /// let mut reader = Reader::from_str("<a><b>t</b></a>", ReaderConfig::default())?;
    /// reader.advance()?;
    /// let a = reader.expand().unwrap();
    /// while reader.advance()? {}
    /// reader.close()?;
    /// assert_eq!(a.to_xml_string()?, "<a><b>t</b></a>");
    /// # Ok::<(), xotreader::Error>(())
    /// ```
    pub fn expand(&mut self) -> Option<Subtree> {
        if let Some(subtree) = &self.expanded {
            return Some(subtree.clone());
        }
        let current = self.view()?;
        if matches!(
            current.node_type,
            NodeType::EndElement | NodeType::DocumentType
        ) {
            return None;
        }
        let origin = current.event.origin;
        let subtree = match (self.walked_document(), origin) {
            (Some(document), Some(root)) => Subtree { document, root },
            _ => match self.materialize() {
                Ok(subtree) => subtree,
                Err(err) => {
                    self.fail(&err);
                    return None;
                }
            },
        };
        if !self.preserved {
            log::debug!("backing store handed out");
        }
        self.preserved = true;
        log::debug!("expanded {:?}", subtree);
        self.expanded = Some(subtree.clone());
        Some(subtree)
    }

    /// Whether a subtree was materialized from the current backing store.
    pub fn is_preserved(&self) -> bool {
        self.preserved
    }

    fn materialize(&mut self) -> Result<Subtree, Error> {
        let events = self.subtree_events()?;
        let inherited = self
            .scope
            .bindings()
            .into_iter()
            .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
            .collect::<Vec<_>>();
        match Rc::get_mut(&mut self.store) {
            // no subtree refers to the store any more
            Some(document) => *document = Document::new(),
            None => {
                log::debug!("backing store shared, starting a new one");
                self.store = Rc::new(Document::new());
                self.preserved = false;
            }
        }
        let document = Rc::make_mut(&mut self.store);
        let mut builder = TreeBuilder::detached(document, inherited);
        for event in &events {
            match event {
                Event::StartElement(tag) => {
                    builder.start_element(tag)?;
                }
                Event::EndElement(_) => builder.end_element(),
                Event::Text(text) => builder.text(text),
                Event::CData(text) => builder.cdata(text),
                Event::Comment(text) => builder.comment(text),
                Event::ProcessingInstruction { target, data } => {
                    builder.processing_instruction(target, data.as_deref())
                }
                Event::EntityReference { replacement, .. } => builder.text(replacement),
                Event::DocumentType { .. } => {}
            }
        }
        let root = builder.finish().ok_or(Error::InvalidState(self.state))?;
        Ok(Subtree {
            document: Rc::clone(&self.store),
            root,
        })
    }

    /// The events of the current node's subtree, reading ahead into the
    /// pending queue as needed.
    fn subtree_events(&mut self) -> Result<Vec<Event>, Error> {
        let current = self.current.as_ref().ok_or(Error::InvalidState(self.state))?;
        let mut events = vec![current.event.event.clone()];
        let name = match &current.event.event {
            Event::StartElement(tag) if !tag.empty => tag.name.full().to_string(),
            _ => return Ok(events),
        };
        let mut nesting = 1usize;
        let mut index = 0;
        while nesting > 0 {
            if index == self.pending.len() {
                match self.pull_engine()? {
                    Some(event) => self.pending.push_back(event),
                    None => return Err(Error::UnclosedTag(name)),
                }
            }
            let NodeEvent { event, .. } = &self.pending[index];
            match event {
                Event::StartElement(tag) if !tag.empty => nesting += 1,
                Event::EndElement(_) => nesting -= 1,
                _ => {}
            }
            events.push(event.clone());
            index += 1;
        }
        Ok(events)
    }

    /// Text content of the current element, or the value of the current
    /// attribute or text node.
    pub fn read_string(&mut self) -> Option<String> {
        match self.node_type() {
            NodeType::Element => Some(self.expand()?.text_content()),
            NodeType::EntityReference if self.cursor != Cursor::Node => {
                self.attribute_part_replacement().map(String::from)
            }
            NodeType::EntityReference => Some(self.expand()?.text_content()),
            NodeType::Attribute
            | NodeType::Text
            | NodeType::CData
            | NodeType::Whitespace
            | NodeType::SignificantWhitespace => self.value().map(String::from),
            _ => None,
        }
    }

    /// The serialized children of the current element, or the value of
    /// the current attribute.
    pub fn read_inner_xml(&mut self) -> Option<String> {
        match self.node_type() {
            NodeType::Element => {
                let subtree = self.expand()?;
                subtree.document.inner_xml(subtree.root).ok()
            }
            NodeType::Attribute => self.value().map(String::from),
            _ => None,
        }
    }

    /// The serialized current node. An attribute is written as
    /// `name="value"`.
    pub fn read_outer_xml(&mut self) -> Option<String> {
        match self.node_type() {
            NodeType::Attribute => {
                let name = self.name()?;
                let value = self.value()?;
                Some(format!(
                    "{}=\"{}\"",
                    name,
                    crate::entity::serialize_attribute(value)
                ))
            }
            NodeType::None | NodeType::EndElement | NodeType::DocumentType => None,
            _ if self.cursor != Cursor::Node => None,
            _ => self.expand()?.to_xml_string().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReaderConfig;

    #[test]
    fn test_store_stays_flat_across_dropped_expansions() {
        let xml = format!("<list>{}</list>", "<item>x</item>".repeat(100));
        let mut reader = Reader::from_str(&xml, ReaderConfig::default()).unwrap();
        let mut sizes = Vec::new();
        let mut store = None;
        while reader.advance().unwrap() {
            if reader.node_type() != NodeType::Element || reader.name() != Some("item") {
                continue;
            }
            let item = reader.expand().unwrap();
            assert_eq!(item.text_content(), "x");
            let document = Rc::as_ptr(item.document());
            assert_eq!(*store.get_or_insert(document), document);
            drop(item);
            sizes.push(reader.store.arena().count());
        }
        assert_eq!(sizes.len(), 100);
        // root, item and its text
        assert!(sizes.iter().all(|size| *size == 3));
    }

    #[test]
    fn test_new_store_when_shared() {
        let mut reader = Reader::from_str("<a><b/><c/></a>", ReaderConfig::default()).unwrap();
        reader.advance().unwrap();
        reader.advance().unwrap();
        let b = reader.expand().unwrap();
        reader.advance().unwrap();
        let c = reader.expand().unwrap();
        assert!(!Rc::ptr_eq(b.document(), c.document()));
        assert_eq!(b.name().as_deref(), Some("b"));
        assert_eq!(c.name().as_deref(), Some("c"));
    }

    #[test]
    fn test_lookahead_is_replayed() {
        let mut reader = Reader::from_str("<a><b>t</b><c/></a>", ReaderConfig::default()).unwrap();
        reader.advance().unwrap();
        reader.expand().unwrap();
        assert_eq!(reader.pending.len(), 5);
        let mut names = Vec::new();
        while reader.advance().unwrap() {
            names.push(reader.name().unwrap().to_string());
        }
        assert_eq!(names, vec!["b", "#text", "b", "c", "a"]);
    }
}
