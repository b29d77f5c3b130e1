use crate::event::StartTag;
use crate::intern::{XMLNS_NAMESPACE, XML_NAMESPACE};

/// What an element contributes to the scope of its descendants.
#[derive(Debug)]
struct Frame {
    depth: usize,
    bindings: Vec<(String, String)>,
    lang: Option<String>,
    space_preserve: Option<bool>,
    base: Option<String>,
}

/// The namespace scope chain at the reader's position.
///
/// One frame per open element, so bindings declared on siblings that were
/// already left, or on descendants not yet visited, are never visible.
#[derive(Debug, Default)]
pub(crate) struct NamespaceScope {
    frames: Vec<Frame>,
}

impl NamespaceScope {
    /// Drop the frames of elements that are no longer open at `depth`.
    ///
    /// An element's own frame stays visible at its end tag, which is at the
    /// same depth; any other node at that depth is outside it.
    pub(crate) fn leave(&mut self, depth: usize, end_tag: bool) {
        while let Some(frame) = self.frames.last() {
            if frame.depth > depth || (frame.depth == depth && !end_tag) {
                self.frames.pop();
            } else {
                break;
            }
        }
    }

    pub(crate) fn enter(&mut self, depth: usize, tag: &StartTag) {
        let mut frame = Frame {
            depth,
            bindings: Vec::new(),
            lang: None,
            space_preserve: None,
            base: None,
        };
        for attribute in &tag.attributes {
            if let Some(prefix) = attribute.declared_prefix() {
                frame
                    .bindings
                    .push((prefix.to_string(), attribute.value.clone()));
                continue;
            }
            match attribute.qname.full() {
                "xml:lang" => frame.lang = Some(attribute.value.clone()),
                "xml:space" => frame.space_preserve = Some(attribute.value == "preserve"),
                "xml:base" => frame.base = Some(attribute.value.clone()),
                _ => {}
            }
        }
        self.frames.push(frame);
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    /// Resolve a prefix; the empty prefix is the default namespace.
    pub(crate) fn lookup(&self, prefix: &str) -> Option<&str> {
        match prefix {
            "xml" => return Some(XML_NAMESPACE),
            "xmlns" => return Some(XMLNS_NAMESPACE),
            _ => {}
        }
        let uri = self
            .frames
            .iter()
            .rev()
            .flat_map(|frame| frame.bindings.iter())
            .find(|(bound, _)| bound == prefix)
            .map(|(_, uri)| uri.as_str())?;
        // xmlns="" undeclares the default namespace
        if uri.is_empty() {
            None
        } else {
            Some(uri)
        }
    }

    /// All bindings in scope, nearest declaration winning.
    pub(crate) fn bindings(&self) -> Vec<(&str, &str)> {
        let mut bindings: Vec<(&str, &str)> = Vec::new();
        for frame in self.frames.iter().rev() {
            for (prefix, uri) in &frame.bindings {
                if !bindings.iter().any(|(bound, _)| bound == prefix) {
                    bindings.push((prefix, uri));
                }
            }
        }
        bindings.reverse();
        bindings
    }

    pub(crate) fn xml_lang(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| frame.lang.as_deref())
    }

    pub(crate) fn preserves_space(&self) -> bool {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.space_preserve)
            .unwrap_or(false)
    }

    pub(crate) fn base(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| frame.base.as_deref())
    }
}
