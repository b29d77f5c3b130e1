use crate::document::{Document, Node};
use crate::error::Error;
use crate::event::{QName, StartTag};
use crate::intern::NameId;
use crate::intern::NamespaceId;
use crate::intern::PrefixId;
use crate::xmlvalue::{Attribute, Element, Prefixes};

/// Builds nodes into a document from start tags, text and the like.
///
/// Used both to parse complete documents and to materialize subtrees. A
/// subtree is built detached: its top node has no parent, and the namespace
/// bindings it inherits are recorded on it so that it stands on its own.
pub(crate) struct TreeBuilder<'d> {
    document: &'d mut Document,
    parent: Option<Node>,
    stack: Vec<Node>,
    top: Option<Node>,
    inherited: Vec<(String, String)>,
}

impl<'d> TreeBuilder<'d> {
    /// Build children of `parent`.
    pub(crate) fn new(document: &'d mut Document, parent: Node) -> Self {
        TreeBuilder {
            document,
            parent: Some(parent),
            stack: Vec::new(),
            top: None,
            inherited: Vec::new(),
        }
    }

    /// Build a detached tree.
    pub(crate) fn detached(document: &'d mut Document, inherited: Vec<(String, String)>) -> Self {
        TreeBuilder {
            document,
            parent: None,
            stack: Vec::new(),
            top: None,
            inherited,
        }
    }

    /// The top node of a detached tree.
    pub(crate) fn finish(self) -> Option<Node> {
        self.top
    }

    fn container(&self) -> Option<Node> {
        self.stack.last().copied().or(self.parent)
    }

    fn add(&mut self, node: Node) {
        match self.container() {
            Some(parent) => self.document.append(parent, node),
            None => {
                if self.top.is_none() {
                    self.top = Some(node);
                }
            }
        }
    }

    pub(crate) fn start_element(&mut self, tag: &StartTag) -> Result<Node, Error> {
        let mut prefixes = Prefixes::new();
        for attribute in &tag.attributes {
            if let Some(prefix) = attribute.declared_prefix() {
                let prefix_id = self.document.add_prefix(prefix);
                let namespace_id = self.document.add_namespace(&attribute.value);
                prefixes.push((prefix_id, namespace_id));
            }
        }
        if self.container().is_none() {
            for (prefix, namespace) in &self.inherited {
                let prefix_id = self.document.add_prefix(prefix);
                if !prefixes.iter().any(|(declared, _)| *declared == prefix_id) {
                    let namespace_id = self.document.add_namespace(namespace);
                    prefixes.push((prefix_id, namespace_id));
                }
            }
        }

        let (prefix_id, name_id) = self.resolve(&tag.name, &prefixes, true)?;
        let mut element = Element::new(name_id, prefix_id);
        for attribute in &tag.attributes {
            if attribute.is_namespace_declaration() {
                continue;
            }
            let (prefix_id, name_id) = self.resolve(&attribute.qname, &prefixes, false)?;
            if element.get_attribute(name_id).is_some() {
                return Err(Error::DuplicateAttribute(attribute.qname.full().to_string()));
            }
            element.attributes.push(Attribute {
                name_id,
                prefix_id,
                value: attribute.value.clone(),
            });
        }
        element.prefixes = prefixes;

        let node = self.document.new_element(element);
        self.add(node);
        if !tag.empty {
            self.stack.push(node);
        }
        Ok(node)
    }

    fn resolve(
        &mut self,
        qname: &QName,
        prefixes: &Prefixes,
        is_element: bool,
    ) -> Result<(PrefixId, NameId), Error> {
        let prefix = qname.prefix().unwrap_or("");
        let prefix_id = self.document.add_prefix(prefix);
        let namespace_id = if prefix.is_empty() && !is_element {
            // unprefixed attributes are in no namespace
            self.document.no_namespace_id
        } else if prefix_id == self.document.xml_prefix_id {
            self.document.xml_namespace_id
        } else if let Some(namespace_id) = self.lookup(prefix_id, prefixes) {
            namespace_id
        } else if prefix.is_empty() {
            self.document.no_namespace_id
        } else {
            return Err(Error::UnknownPrefix(prefix.to_string()));
        };
        let name_id = self.document.add_name_ns(qname.local(), namespace_id);
        Ok((prefix_id, name_id))
    }

    fn lookup(&self, prefix_id: PrefixId, prefixes: &Prefixes) -> Option<NamespaceId> {
        prefixes
            .iter()
            .find(|(declared, _)| *declared == prefix_id)
            .map(|(_, namespace_id)| *namespace_id)
            .or_else(|| {
                self.container()
                    .and_then(|node| self.document.namespace_for_prefix(node, prefix_id))
            })
    }

    pub(crate) fn end_element(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn text(&mut self, text: &str) {
        match self.container() {
            Some(parent) => self.document.append_text(parent, text),
            None => {
                let node = self.document.new_text(text);
                self.add(node);
            }
        }
    }

    pub(crate) fn cdata(&mut self, text: &str) {
        let node = self.document.new_cdata(text);
        self.add(node);
    }

    pub(crate) fn comment(&mut self, text: &str) {
        let node = self.document.new_comment(text);
        self.add(node);
    }

    pub(crate) fn processing_instruction(&mut self, target: &str, data: Option<&str>) {
        let node = self.document.new_processing_instruction(target, data);
        self.add(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AttributeData;

    fn start(name: &str, attributes: &[(&str, &str)], empty: bool) -> StartTag {
        StartTag {
            name: QName::new(name.to_string()),
            attributes: attributes
                .iter()
                .map(|(name, value)| AttributeData::new(name.to_string(), value.to_string()))
                .collect(),
            empty,
        }
    }

    #[test]
    fn test_build_children() {
        let mut document = Document::new();
        let root = document.root();
        let mut builder = TreeBuilder::new(&mut document, root);
        builder
            .start_element(&start("a", &[("x", "1")], false))
            .unwrap();
        builder.text("hello ");
        builder.text("world");
        builder.start_element(&start("b", &[], true)).unwrap();
        builder.end_element();
        assert!(builder.finish().is_none());

        let a = document.document_element().unwrap();
        assert_eq!(document.children(a).count(), 2);
        assert_eq!(document.text_content_str(a), "hello world");
        let x = document.name("x").unwrap();
        assert_eq!(document.element(a).unwrap().get_attribute(x), Some("1"));
    }

    #[test]
    fn test_detached_inherits_bindings() {
        let mut document = Document::new();
        let mut builder =
            TreeBuilder::detached(&mut document, vec![("p".to_string(), "urn:p".to_string())]);
        let top = builder.start_element(&start("p:a", &[], false)).unwrap();
        builder.start_element(&start("p:b", &[], true)).unwrap();
        builder.end_element();
        assert_eq!(builder.finish(), Some(top));

        assert_eq!(document.parent(top), None);
        let b = document.first_child(top).unwrap();
        assert_eq!(document.lookup_namespace(b, "p"), Some("urn:p"));
        let name = document.element(b).unwrap().name();
        assert_eq!(document.name_namespace_str(name), "urn:p");
    }

    #[test]
    fn test_unknown_prefix() {
        let mut document = Document::new();
        let root = document.root();
        let mut builder = TreeBuilder::new(&mut document, root);
        let result = builder.start_element(&start("q:a", &[], true));
        assert!(matches!(result, Err(Error::UnknownPrefix(prefix)) if prefix == "q"));
    }

    #[test]
    fn test_duplicate_expanded_name() {
        let mut document = Document::new();
        let root = document.root();
        let mut builder = TreeBuilder::new(&mut document, root);
        let result = builder.start_element(&start(
            "a",
            &[("xmlns:p", "urn:x"), ("xmlns:q", "urn:x"), ("p:b", "1"), ("q:b", "2")],
            true,
        ));
        assert!(matches!(result, Err(Error::DuplicateAttribute(name)) if name == "q:b"));
    }
}
