use indextree::{Arena, NodeId};

use crate::intern::{
    ExpandedName, NameId, Names, NamespaceId, Namespaces, PrefixId, PrefixTable, XML_NAMESPACE,
};
use crate::xmlvalue::{Element, Value, ValueType};

pub(crate) type XmlArena = Arena<Value>;

/// A node in a materialized tree.
/// Cheap to copy; only meaningful with the document it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// Information from the XML declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    /// The declared XML version.
    pub version: Option<String>,
    /// The declared encoding.
    pub encoding: Option<String>,
    /// The declared standalone status.
    pub standalone: Option<bool>,
}

/// A materialized XML tree.
///
/// A `Document` holds a document root and its descendants, and also serves
/// as the backing store for subtrees materialized by a
/// [`Reader`](crate::Reader); those are kept as detached trees in the same
/// arena.
#[derive(Clone)]
pub struct Document {
    pub(crate) arena: XmlArena,
    pub(crate) namespaces: Namespaces,
    pub(crate) prefixes: PrefixTable,
    pub(crate) names: Names,
    pub(crate) no_namespace_id: NamespaceId,
    pub(crate) empty_prefix_id: PrefixId,
    pub(crate) xml_namespace_id: NamespaceId,
    pub(crate) xml_prefix_id: PrefixId,
    pub(crate) root: Node,
    pub(crate) declaration: Declaration,
}

impl Document {
    /// Create a new, empty document.
    pub fn new() -> Self {
        let mut namespaces = Namespaces::new();
        let no_namespace_id = namespaces.intern(String::new());
        let xml_namespace_id = namespaces.intern(XML_NAMESPACE.to_string());
        let mut prefixes = PrefixTable::new();
        let empty_prefix_id = prefixes.intern(String::new());
        let xml_prefix_id = prefixes.intern("xml".to_string());
        let mut arena = XmlArena::new();
        let root = Node::new(arena.new_node(Value::Root));
        Document {
            arena,
            namespaces,
            prefixes,
            names: Names::new(),
            no_namespace_id,
            empty_prefix_id,
            xml_namespace_id,
            xml_prefix_id,
            root,
            declaration: Declaration::default(),
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &XmlArena {
        &self.arena
    }

    /// The document root.
    ///
    /// This is not the document element but the node that contains it.
    pub fn root(&self) -> Node {
        self.root
    }

    /// The document element, if the document has one.
    pub fn document_element(&self) -> Option<Node> {
        self.children(self.root)
            .find(|child| self.value_type(*child) == ValueType::Element)
    }

    /// Information from the XML declaration of a parsed document.
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// The value of a node.
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        self.arena[node.0].get()
    }

    /// The type of a node's value.
    pub fn value_type(&self, node: Node) -> ValueType {
        self.value(node).value_type()
    }

    /// Whether the node is an element.
    pub fn is_element(&self, node: Node) -> bool {
        self.value_type(node) == ValueType::Element
    }

    /// The element value, if the node is an element.
    pub fn element(&self, node: Node) -> Option<&Element> {
        match self.value(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The text of a text or CDATA node.
    pub fn text_str(&self, node: Node) -> Option<&str> {
        match self.value(node) {
            Value::Text(text) | Value::CData(text) => Some(text.get()),
            _ => None,
        }
    }

    /// Look up a name without a namespace.
    pub fn name(&self, name: &str) -> Option<NameId> {
        self.names
            .find(&ExpandedName::new(name, self.no_namespace_id))
    }

    /// Look up a name in a namespace.
    pub fn name_ns(&self, name: &str, namespace: &str) -> Option<NameId> {
        let namespace_id = self.namespace(namespace)?;
        self.names.find(&ExpandedName::new(name, namespace_id))
    }

    /// Look up a namespace.
    pub fn namespace(&self, namespace: &str) -> Option<NamespaceId> {
        self.namespaces.find(&namespace.to_string())
    }

    /// Look up a prefix.
    pub fn prefix(&self, prefix: &str) -> Option<PrefixId> {
        self.prefixes.find(&prefix.to_string())
    }

    /// The local name of a name.
    pub fn local_name_str(&self, name_id: NameId) -> &str {
        &self.names.resolve(name_id).local
    }

    /// The namespace URI of a name; empty if it has no namespace.
    pub fn name_namespace_str(&self, name_id: NameId) -> &str {
        self.namespace_str(self.names.resolve(name_id).namespace)
    }

    /// The namespace URI.
    pub fn namespace_str(&self, namespace_id: NamespaceId) -> &str {
        self.namespaces.resolve(namespace_id)
    }

    /// The prefix string; empty for the empty prefix.
    pub fn prefix_str(&self, prefix_id: PrefixId) -> &str {
        self.prefixes.resolve(prefix_id)
    }

    /// The empty prefix.
    pub fn empty_prefix(&self) -> PrefixId {
        self.empty_prefix_id
    }

    /// The qualified name of an element, as written in the source.
    pub fn qualified_name(&self, node: Node) -> Option<String> {
        let element = self.element(node)?;
        Some(self.qualify(element.prefix_id, element.name_id))
    }

    pub(crate) fn qualify(&self, prefix_id: PrefixId, name_id: NameId) -> String {
        let local = self.local_name_str(name_id);
        if prefix_id == self.empty_prefix_id {
            local.to_string()
        } else {
            format!("{}:{}", self.prefix_str(prefix_id), local)
        }
    }

    pub(crate) fn add_name_ns(&mut self, name: &str, namespace_id: NamespaceId) -> NameId {
        self.names.intern(ExpandedName::new(name, namespace_id))
    }

    pub(crate) fn add_namespace(&mut self, namespace: &str) -> NamespaceId {
        self.namespaces.intern(namespace.to_string())
    }

    pub(crate) fn add_prefix(&mut self, prefix: &str) -> PrefixId {
        self.prefixes.intern(prefix.to_string())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.arena.count())
            .field("declaration", &self.declaration)
            .finish()
    }
}
