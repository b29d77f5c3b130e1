use crate::intern::NameId;
use crate::intern::NamespaceId;
use crate::intern::PrefixId;

/// What kind of value a tree node holds, without the payload.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueType {
    Root,
    Element,
    Text,
    CData,
    ProcessingInstruction,
    Comment,
}

/// The payload of a node in a materialized tree.
///
/// Subtrees built by [`Reader::expand`](crate::Reader::expand) never
/// contain entity reference nodes; references are stored as their
/// replacement text.
#[derive(Debug, Clone)]
pub enum Value {
    /// The container of a parsed document. Its element child is the
    /// document element.
    Root,
    Element(Element),
    Text(Text),
    /// Character data that was written as `<![CDATA[...]]>`.
    CData(Text),
    ProcessingInstruction(ProcessingInstruction),
    Comment(Comment),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Root => ValueType::Root,
            Value::Element(_) => ValueType::Element,
            Value::Text(_) => ValueType::Text,
            Value::CData(_) => ValueType::CData,
            Value::Comment(_) => ValueType::Comment,
            Value::ProcessingInstruction(_) => ValueType::ProcessingInstruction,
        }
    }
}

/// Namespace declarations on an element, in declaration order.
pub type Prefixes = Vec<(PrefixId, NamespaceId)>;

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) name_id: NameId,
    pub(crate) prefix_id: PrefixId,
    pub(crate) value: String,
}

impl Attribute {
    /// The name of the attribute.
    pub fn name(&self) -> NameId {
        self.name_id
    }

    /// The prefix the attribute was written with. This is the empty prefix
    /// for attributes without a prefix.
    pub fn prefix(&self) -> PrefixId {
        self.prefix_id
    }

    /// The attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An element: its expanded name, the prefix it was written with, its
/// namespace declarations and its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name_id: NameId,
    pub(crate) prefix_id: PrefixId,
    pub(crate) prefixes: Prefixes,
    pub(crate) attributes: Vec<Attribute>,
}

impl Element {
    pub(crate) fn new(name_id: NameId, prefix_id: PrefixId) -> Self {
        Element {
            name_id,
            prefix_id,
            prefixes: Prefixes::new(),
            attributes: Vec::new(),
        }
    }

    /// The name of the element.
    ///
    /// ```rust
    /// use xotreader::Document;
    ///
    /// let doc = Document::parse("<doc/>")?;
    /// let doc_el = doc.document_element().unwrap();
    /// let element = doc.element(doc_el).unwrap();
    /// assert_eq!(Some(element.name()), doc.name("doc"));
    /// # Ok::<(), xotreader::Error>(())
    /// ```
    pub fn name(&self) -> NameId {
        self.name_id
    }

    /// The prefix the element was written with.
    pub fn prefix(&self) -> PrefixId {
        self.prefix_id
    }

    /// The attributes of the element, in document order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The value of the attribute with this expanded name.
    ///
    /// ```rust
    /// use xotreader::Document;
    ///
    /// let doc = Document::parse(r#"<doc a="A" />"#)?;
    /// let doc_el = doc.document_element().unwrap();
    /// let element = doc.element(doc_el).unwrap();
    /// let name_a = doc.name("a").unwrap();
    ///
    /// assert_eq!(element.get_attribute(name_a), Some("A"));
    /// # Ok::<(), xotreader::Error>(())
    /// ```
    pub fn get_attribute(&self, name_id: NameId) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name_id == name_id)
            .map(|attribute| attribute.value.as_str())
    }

    /// The namespace bound to a prefix by a declaration on this element
    /// itself. Use [`Document::lookup_namespace`](crate::Document::lookup_namespace)
    /// to take ancestors into account.
    pub fn get_namespace(&self, prefix_id: PrefixId) -> Option<NamespaceId> {
        self.prefixes
            .iter()
            .find(|(p, _)| *p == prefix_id)
            .map(|(_, namespace_id)| *namespace_id)
    }

    /// The namespace declarations on this element.
    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    pub(crate) fn set_prefix(&mut self, prefix_id: PrefixId, namespace_id: NamespaceId) {
        if let Some(entry) = self.prefixes.iter_mut().find(|(p, _)| *p == prefix_id) {
            entry.1 = namespace_id;
        } else {
            self.prefixes.push((prefix_id, namespace_id));
        }
    }
}

/// Character data, with entity and character references already replaced.
#[derive(Debug, Clone)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    pub fn get(&self) -> &str {
        &self.text
    }
}

/// The content between `<!--` and `-->`.
#[derive(Debug, Clone)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    pub fn get(&self) -> &str {
        &self.text
    }
}

/// A processing instruction. The data is `None` when nothing follows the
/// target.
#[derive(Debug, Clone)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Option<String>,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: Option<String>) -> Self {
        ProcessingInstruction { target, data }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}
