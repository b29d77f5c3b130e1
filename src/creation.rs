use crate::document::{Document, Node};
use crate::xmlvalue::{Comment, Element, ProcessingInstruction, Text, Value};

impl Document {
    pub(crate) fn new_node(&mut self, value: Value) -> Node {
        Node::new(self.arena.new_node(value))
    }

    pub(crate) fn new_text(&mut self, text: &str) -> Node {
        self.new_node(Value::Text(Text::new(text.to_string())))
    }

    pub(crate) fn new_cdata(&mut self, text: &str) -> Node {
        self.new_node(Value::CData(Text::new(text.to_string())))
    }

    pub(crate) fn new_element(&mut self, element: Element) -> Node {
        self.new_node(Value::Element(element))
    }

    pub(crate) fn new_comment(&mut self, comment: &str) -> Node {
        self.new_node(Value::Comment(Comment::new(comment.to_string())))
    }

    pub(crate) fn new_processing_instruction(&mut self, target: &str, data: Option<&str>) -> Node {
        let pi = ProcessingInstruction::new(target.to_string(), data.map(|s| s.to_string()));
        self.new_node(Value::ProcessingInstruction(pi))
    }

    pub(crate) fn append(&mut self, parent: Node, child: Node) {
        parent.get().append(child.get(), &mut self.arena);
    }

    /// Append text to a parent. Text following a text node is merged into
    /// it, so that text split by references ends up as a single node.
    pub(crate) fn append_text(&mut self, parent: Node, text: &str) {
        if let Some(last) = self.last_child(parent) {
            if let Value::Text(last_text) = self.arena[last.get()].get_mut() {
                last_text.text.push_str(text);
                return;
            }
        }
        let child = self.new_text(text);
        self.append(parent, child);
    }
}
