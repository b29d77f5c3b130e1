use indextree::NodeEdge as IndexTreeNodeEdge;

use crate::document::{Document, Node};
use crate::intern::NamespaceId;
use crate::intern::PrefixId;
use crate::xmlvalue::Value;

/// One side of a node as [`Document::traverse`] passes it.
///
/// Leaf nodes produce their `End` right after their `Start`. The walker
/// reader turns these edges into reader events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEdge {
    Start(Node),
    End(Node),
}

/// ## Navigation
impl Document {
    /// The parent; [`None`] for the document root and for the top node of
    /// a materialized subtree.
    ///
    /// ```rust
    /// let doc = xotreader::Document::parse("<p>Example</p>").unwrap();
    /// let p = doc.document_element().unwrap();
    /// let text = doc.first_child(p).unwrap();
    /// assert_eq!(doc.parent(text), Some(p));
    /// assert_eq!(doc.parent(p), Some(doc.root()));
    /// assert_eq!(doc.parent(doc.root()), None);
    /// ```
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].parent().map(Node::new)
    }

    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].first_child().map(Node::new)
    }

    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].last_child().map(Node::new)
    }

    /// The following sibling, if any.
    ///
    /// ```rust
    /// let doc = xotreader::Document::parse("<p><a/><b/></p>").unwrap();
    /// let p = doc.document_element().unwrap();
    /// let a = doc.first_child(p).unwrap();
    /// let b = doc.next_sibling(a).unwrap();
    /// assert_eq!(doc.next_sibling(b), None);
    /// ```
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].next_sibling().map(Node::new)
    }

    pub fn previous_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].previous_sibling().map(Node::new)
    }

    /// This node, then its parent, up to the top of its tree.
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().ancestors(self.arena()).map(Node::new)
    }

    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(self.arena()).map(Node::new)
    }

    /// This node and everything below it, in document order.
    ///
    /// ```rust
    /// let doc = xotreader::Document::parse("<a><b><c/></b></a>").unwrap();
    /// let a = doc.document_element().unwrap();
    /// let b = doc.first_child(a).unwrap();
    /// let c = doc.first_child(b).unwrap();
    ///
    /// let descendants = doc.descendants(a).collect::<Vec<_>>();
    /// assert_eq!(descendants, vec![a, b, c]);
    /// ```
    pub fn descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().descendants(self.arena()).map(Node::new)
    }

    /// Start and end edges of this node and its descendants, in document
    /// order. `<a><b/></a>` yields start a, start b, end b, end a.
    pub fn traverse(&self, node: Node) -> impl Iterator<Item = NodeEdge> + '_ {
        node.get().traverse(self.arena()).map(|edge| match edge {
            IndexTreeNodeEdge::Start(node_id) => NodeEdge::Start(Node::new(node_id)),
            IndexTreeNodeEdge::End(node_id) => NodeEdge::End(Node::new(node_id)),
        })
    }

    /// The concatenated text of all text and CDATA descendants.
    ///
    /// ```rust
    /// let doc = xotreader::Document::parse("<p>Hello <b>world</b>!</p>").unwrap();
    /// let p = doc.document_element().unwrap();
    /// assert_eq!(doc.text_content_str(p), "Hello world!");
    /// ```
    pub fn text_content_str(&self, node: Node) -> String {
        let mut content = String::new();
        for descendant in self.descendants(node) {
            if let Value::Text(text) | Value::CData(text) = self.value(descendant) {
                content.push_str(text.get());
            }
        }
        content
    }

    /// Resolve a prefix to a namespace URI in the scope of a node.
    ///
    /// The nearest ancestor-or-self element declaring the prefix wins. The
    /// empty prefix resolves the default namespace.
    ///
    /// ```rust
    /// let doc = xotreader::Document::parse(
    ///     r#"<a xmlns:x="http://example.com/x"><b/></a>"#
    /// ).unwrap();
    /// let a = doc.document_element().unwrap();
    /// let b = doc.first_child(a).unwrap();
    /// assert_eq!(doc.lookup_namespace(b, "x"), Some("http://example.com/x"));
    /// assert_eq!(doc.lookup_namespace(b, "y"), None);
    /// ```
    pub fn lookup_namespace(&self, node: Node, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(self.namespace_str(self.xml_namespace_id));
        }
        let prefix_id = self.prefix(prefix)?;
        let namespace = self.namespace_str(self.namespace_for_prefix(node, prefix_id)?);
        // an empty default declaration undeclares the default namespace
        if namespace.is_empty() {
            None
        } else {
            Some(namespace)
        }
    }

    pub(crate) fn namespace_for_prefix(&self, node: Node, prefix_id: PrefixId) -> Option<NamespaceId> {
        self.ancestors(node)
            .find_map(|ancestor| self.element(ancestor)?.get_namespace(prefix_id))
    }
}
