use crate::document::Node;
use crate::entity::Segment;

/// A qualified name as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QName {
    full: String,
    colon: Option<usize>,
}

impl QName {
    pub(crate) fn new(full: String) -> Self {
        let colon = full.find(':');
        QName { full, colon }
    }

    pub(crate) fn full(&self) -> &str {
        &self.full
    }

    pub(crate) fn prefix(&self) -> Option<&str> {
        self.colon.map(|colon| &self.full[..colon])
    }

    pub(crate) fn local(&self) -> &str {
        match self.colon {
            Some(colon) => &self.full[colon + 1..],
            None => &self.full,
        }
    }
}

/// An attribute on a start tag, namespace declarations included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeData {
    pub(crate) qname: QName,
    /// The value with all references expanded.
    pub(crate) value: String,
    /// The value split at entity references.
    pub(crate) parts: Vec<Segment>,
    /// Supplied by an attribute default declaration.
    pub(crate) is_default: bool,
}

impl AttributeData {
    pub(crate) fn new(qname: String, value: String) -> Self {
        let parts = vec![Segment::Text(value.clone())];
        AttributeData {
            qname: QName::new(qname),
            value,
            parts,
            is_default: false,
        }
    }

    pub(crate) fn is_namespace_declaration(&self) -> bool {
        self.declared_prefix().is_some()
    }

    /// The prefix bound by a namespace declaration; empty for a default
    /// namespace declaration.
    pub(crate) fn declared_prefix(&self) -> Option<&str> {
        match self.qname.prefix() {
            Some("xmlns") => Some(self.qname.local()),
            None if self.qname.full() == "xmlns" => Some(""),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartTag {
    pub(crate) name: QName,
    pub(crate) attributes: Vec<AttributeData>,
    /// Written as `<a/>`, or an element without children in a walked
    /// document. No end event follows.
    pub(crate) empty: bool,
}

/// A node produced by a parse engine, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    DocumentType { name: String },
    StartElement(StartTag),
    EndElement(QName),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: Option<String> },
    EntityReference { name: String, replacement: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeEvent {
    pub(crate) event: Event,
    /// The node this event was produced from, when walking a document.
    pub(crate) origin: Option<Node>,
}

impl NodeEvent {
    pub(crate) fn new(event: Event) -> Self {
        NodeEvent {
            event,
            origin: None,
        }
    }

    pub(crate) fn from_node(event: Event, node: Node) -> Self {
        NodeEvent {
            event,
            origin: Some(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_split() {
        let name = QName::new("x:a".to_string());
        assert_eq!(name.prefix(), Some("x"));
        assert_eq!(name.local(), "a");
        let name = QName::new("a".to_string());
        assert_eq!(name.prefix(), None);
        assert_eq!(name.local(), "a");
    }

    #[test]
    fn test_namespace_declaration() {
        assert_eq!(
            AttributeData::new("xmlns".to_string(), "u".to_string()).declared_prefix(),
            Some("")
        );
        assert_eq!(
            AttributeData::new("xmlns:x".to_string(), "u".to_string()).declared_prefix(),
            Some("x")
        );
        assert!(!AttributeData::new("x:xmlns".to_string(), "u".to_string())
            .is_namespace_declaration());
        assert!(!AttributeData::new("a".to_string(), "u".to_string()).is_namespace_declaration());
    }
}
