use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::rc::Rc;

use crate::config::ReaderConfig;
use crate::document::{Declaration, Document};
use crate::encoding::override_encoding;
use crate::engine::{self, is_whitespace, Engine, Position};
use crate::entity::Segment;
use crate::error::Error;
use crate::event::{AttributeData, Event, NodeEvent, StartTag};
use crate::expand::Subtree;
use crate::intern::XMLNS_NAMESPACE;
use crate::nodetype::{NodeType, ReadState};
use crate::scope::NamespaceScope;
use crate::validate::{ValidationMessage, Validator, ValidatorKind};
use crate::walker::WalkerEngine;

/// The node the reader is positioned on.
#[derive(Debug)]
pub(crate) struct Current {
    pub(crate) node_type: NodeType,
    pub(crate) depth: usize,
    pub(crate) event: NodeEvent,
}

/// Where within the current node the reader is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursor {
    /// On the node itself.
    Node,
    /// On an attribute of the current element.
    Attribute(usize),
    /// On a part of an attribute value.
    AttributeValue { index: usize, part: usize },
}

/// A cursor-based pull reader over an XML document.
///
/// The reader moves through the document in document order, one node per
/// [`advance`](Reader::advance). After each move the node it is positioned
/// on can be inspected, its attributes visited, prefixes resolved in the
/// scope of the node, and the subtree it starts can be materialized with
/// [`expand`](Reader::expand).
///
/// ```rust
/// use xotreader::{NodeType, Reader, ReaderConfig};
///
/// let mut reader = Reader::from_str(r#"<a x="1"><b>t</b></a>"#, ReaderConfig::default())?;
/// let mut seen = Vec::new();
/// while reader.advance()? {
///     seen.push((reader.node_type(), reader.depth()));
/// }
/// assert_eq!(seen, vec![
///     (NodeType::Element, 0),
///     (NodeType::Element, 1),
///     (NodeType::Text, 2),
///     (NodeType::EndElement, 1),
///     (NodeType::EndElement, 0),
/// ]);
/// # Ok::<(), xotreader::Error>(())
/// ```
pub struct Reader<'a> {
    engine: Option<Box<dyn Engine + 'a>>,
    pub(crate) state: ReadState,
    config: ReaderConfig,
    pub(crate) pending: VecDeque<NodeEvent>,
    pub(crate) current: Option<Current>,
    pub(crate) cursor: Cursor,
    pub(crate) scope: NamespaceScope,
    level: usize,
    pub(crate) store: Rc<Document>,
    pub(crate) preserved: bool,
    pub(crate) expanded: Option<Subtree>,
    validator: Option<Box<dyn Validator + 'a>>,
    validating: Option<ValidatorKind>,
    invalid: bool,
    message_handler: Option<Box<dyn FnMut(&ValidationMessage) + 'a>>,
}

/// ## Construction
impl<'a> Reader<'a> {
    fn new(engine: Box<dyn Engine + 'a>, config: ReaderConfig) -> Self {
        Reader {
            engine: Some(engine),
            state: ReadState::Initial,
            config,
            pending: VecDeque::new(),
            current: None,
            cursor: Cursor::Node,
            scope: NamespaceScope::default(),
            level: 0,
            store: Rc::new(Document::new()),
            preserved: false,
            expanded: None,
            validator: None,
            validating: None,
            invalid: false,
            message_handler: None,
        }
    }

    /// Read XML from a string.
    ///
    /// The string is already decoded, so an encoding in `config` is only
    /// checked to be a known label.
    pub fn from_str(xml: &'a str, config: ReaderConfig) -> Result<Reader<'a>, Error> {
        if let Some(label) = &config.encoding {
            override_encoding(label)?;
        }
        log::debug!("reader over {} bytes of text", xml.len());
        let engine = engine::open_utf8(xml.as_bytes(), &config);
        Ok(Reader::new(engine, config))
    }

    /// Read XML from a byte stream.
    ///
    /// The encoding is detected from a byte order mark or the XML
    /// declaration, unless `config` overrides it.
    pub fn from_reader<R: Read + 'a>(source: R, config: ReaderConfig) -> Result<Reader<'a>, Error> {
        log::debug!("reader over byte stream");
        let engine = engine::open(BufReader::new(source), &config)?;
        Ok(Reader::new(engine, config))
    }

    /// Walk a parsed document.
    ///
    /// This is the only kind of reader that supports
    /// [`skip_to_next_sibling`](Reader::skip_to_next_sibling). Materialized
    /// subtrees point into the walked document itself.
    pub fn walker(document: Rc<Document>) -> Reader<'a> {
        log::debug!("walker over {} nodes", document.arena().count());
        Reader::new(
            Box::new(WalkerEngine::new(document)),
            ReaderConfig::default(),
        )
    }
}

impl Reader<'static> {
    /// Read XML from a file.
    ///
    /// Fails if the file cannot be opened. The path serves as base URI
    /// unless `config` supplies one.
    pub fn from_file<P: AsRef<Path>>(path: P, mut config: ReaderConfig) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if config.base_uri.is_none() {
            config.base_uri = Some(path.display().to_string());
        }
        log::debug!("reader over file {}", path.display());
        let engine = engine::open(BufReader::new(file), &config)?;
        Ok(Reader::new(engine, config))
    }
}

/// ## Traversal
impl<'a> Reader<'a> {
    /// Move to the next node in document order.
    ///
    /// Returns `Ok(true)` when the reader moved, `Ok(false)` when there are
    /// no more nodes, and an error when reading failed. After a failure the
    /// reader is in [`ReadState::Error`] and every later read fails too.
    /// Any attribute mode is left.
    pub fn advance(&mut self) -> Result<bool, Error> {
        self.check_readable()?;
        if self.state == ReadState::EndOfFile {
            return Ok(false);
        }
        self.cursor = Cursor::Node;
        self.expanded = None;
        let result = self.step();
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    /// Move to the node following the current one, skipping its subtree.
    pub fn skip(&mut self) -> Result<bool, Error> {
        let start = self.view().and_then(|current| match &current.event.event {
            Event::StartElement(tag) if !tag.empty => Some(current.depth),
            _ => None,
        });
        if let Some(depth) = start {
            loop {
                if !self.advance()? {
                    return Ok(false);
                }
                if let Some(current) = &self.current {
                    if current.node_type == NodeType::EndElement && current.depth == depth {
                        break;
                    }
                }
            }
        }
        self.advance()
    }

    /// Move to the following sibling of the current node, skipping the
    /// rest of its subtree.
    ///
    /// Only readers made with [`Reader::walker`] support this; others fail
    /// with [`Error::UnsupportedOperation`] without changing state. Returns
    /// `Ok(false)` and stays put when there is no following sibling.
    pub fn skip_to_next_sibling(&mut self) -> Result<bool, Error> {
        self.check_readable()?;
        let engine = self.engine.as_ref().ok_or(Error::Closed)?;
        if engine.document().is_none() {
            return Err(Error::UnsupportedOperation("skip_to_next_sibling"));
        }
        let depth = match (self.state, &self.current) {
            (ReadState::EndOfFile, _) => return Ok(false),
            (_, None) => return self.advance(),
            (_, Some(current)) => current.depth,
        };
        self.cursor = Cursor::Node;
        self.expanded = None;
        let result = self.sibling(depth);
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    fn sibling(&mut self, depth: usize) -> Result<bool, Error> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        match engine.next_sibling()? {
            Some(event) => {
                self.level = depth;
                self.consume(event)?;
                self.run_validator();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Close the reader.
    ///
    /// Releases the parse engine and its input. Closing twice is fine. An
    /// attached validator is finished first. Subtrees materialized earlier
    /// stay valid.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.state == ReadState::Closed {
            return Ok(());
        }
        self.finish_validator();
        self.engine = None;
        self.pending.clear();
        self.current = None;
        self.cursor = Cursor::Node;
        self.expanded = None;
        self.scope.clear();
        self.state = ReadState::Closed;
        log::debug!("reader closed");
        Ok(())
    }

    /// The read state.
    pub fn read_state(&self) -> ReadState {
        self.state
    }

    fn check_readable(&self) -> Result<(), Error> {
        match self.state {
            ReadState::Closed => Err(Error::Closed),
            ReadState::Error => Err(Error::InvalidState(ReadState::Error)),
            _ => Ok(()),
        }
    }

    fn step(&mut self) -> Result<bool, Error> {
        let Some(event) = self.pull()? else {
            self.state = ReadState::EndOfFile;
            log::debug!("end of document");
            self.finish_validator();
            return Ok(false);
        };
        self.consume(event)?;
        self.state = ReadState::Interactive;
        self.run_validator();
        Ok(true)
    }

    pub(crate) fn fail(&mut self, err: &Error) {
        log::debug!("read failed: {}", err);
        self.state = ReadState::Error;
        self.current = None;
        self.cursor = Cursor::Node;
        self.expanded = None;
    }

    /// The next event, looked-ahead events first.
    fn pull(&mut self) -> Result<Option<NodeEvent>, Error> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        self.pull_engine()
    }

    pub(crate) fn pull_engine(&mut self) -> Result<Option<NodeEvent>, Error> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        let state = std::mem::replace(&mut self.state, ReadState::Reading);
        let result = engine.next_event();
        self.state = state;
        result
    }

    fn consume(&mut self, event: NodeEvent) -> Result<(), Error> {
        let is_end = matches!(event.event, Event::EndElement(_));
        let depth = if is_end {
            self.level.saturating_sub(1)
        } else {
            self.level
        };
        self.scope.leave(depth, is_end);
        let node_type = match &event.event {
            Event::StartElement(tag) => {
                self.scope.enter(depth, tag);
                self.check_prefixes(tag)?;
                if !tag.empty {
                    self.level += 1;
                }
                NodeType::Element
            }
            Event::EndElement(_) => {
                self.level = depth;
                NodeType::EndElement
            }
            Event::Text(text) if is_whitespace(text) => {
                if self.scope.preserves_space() {
                    NodeType::SignificantWhitespace
                } else {
                    NodeType::Whitespace
                }
            }
            Event::Text(_) => NodeType::Text,
            Event::CData(_) => NodeType::CData,
            Event::Comment(_) => NodeType::Comment,
            Event::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            Event::DocumentType { .. } => NodeType::DocumentType,
            Event::EntityReference { .. } => NodeType::EntityReference,
        };
        log::trace!("{:?} at depth {}", node_type, depth);
        self.current = Some(Current {
            node_type,
            depth,
            event,
        });
        Ok(())
    }

    fn check_prefixes(&self, tag: &StartTag) -> Result<(), Error> {
        let attribute_prefixes = tag
            .attributes
            .iter()
            .filter(|attribute| !attribute.is_namespace_declaration())
            .filter_map(|attribute| attribute.qname.prefix());
        for prefix in tag.name.prefix().into_iter().chain(attribute_prefixes) {
            if self.scope.lookup(prefix).is_none() {
                return Err(Error::UnknownPrefix(prefix.to_string()));
            }
        }
        Ok(())
    }
}

/// ## Node properties
impl<'a> Reader<'a> {
    /// The current node, unless the reader failed or was closed.
    pub(crate) fn view(&self) -> Option<&Current> {
        match self.state {
            ReadState::Error | ReadState::Closed => None,
            _ => self.current.as_ref(),
        }
    }

    pub(crate) fn start_tag(&self) -> Option<&StartTag> {
        match &self.view()?.event.event {
            Event::StartElement(tag) => Some(tag),
            _ => None,
        }
    }

    /// The attribute the cursor is on, in attribute mode.
    pub(crate) fn current_attribute(&self) -> Option<&AttributeData> {
        let index = match self.cursor {
            Cursor::Node => return None,
            Cursor::Attribute(index) | Cursor::AttributeValue { index, .. } => index,
        };
        self.start_tag()?.attributes.get(index)
    }

    fn current_part(&self) -> Option<&Segment> {
        match self.cursor {
            Cursor::AttributeValue { part, .. } => self.current_attribute()?.parts.get(part),
            _ => None,
        }
    }

    /// The type of the current node; [`NodeType::None`] when not
    /// positioned on a node.
    pub fn node_type(&self) -> NodeType {
        let Some(current) = self.view() else {
            return NodeType::None;
        };
        match self.cursor {
            Cursor::Node => current.node_type,
            Cursor::Attribute(_) => NodeType::Attribute,
            Cursor::AttributeValue { .. } => match self.current_part() {
                Some(Segment::Reference { .. }) => NodeType::EntityReference,
                _ => NodeType::Text,
            },
        }
    }

    /// The nesting depth of the current node; the document element is at
    /// depth 0. Attribute mode does not change the depth.
    pub fn depth(&self) -> usize {
        self.view().map(|current| current.depth).unwrap_or(0)
    }

    /// The qualified name of the current node.
    ///
    /// Nodes without a name of their own have a fixed one: `#text`,
    /// `#cdata-section` or `#comment`.
    pub fn name(&self) -> Option<&str> {
        let current = self.view()?;
        if self.cursor != Cursor::Node {
            return match self.current_part() {
                Some(Segment::Text(_)) => Some("#text"),
                Some(Segment::Reference { name, .. }) => Some(name.as_str()),
                None => Some(self.current_attribute()?.qname.full()),
            };
        }
        Some(match &current.event.event {
            Event::StartElement(tag) => tag.name.full(),
            Event::EndElement(name) => name.full(),
            Event::Text(_) => "#text",
            Event::CData(_) => "#cdata-section",
            Event::Comment(_) => "#comment",
            Event::ProcessingInstruction { target, .. } => target.as_str(),
            Event::DocumentType { name } => name.as_str(),
            Event::EntityReference { name, .. } => name.as_str(),
        })
    }

    /// The local part of the name of the current node.
    pub fn local_name(&self) -> Option<&str> {
        let current = self.view()?;
        if self.cursor != Cursor::Node {
            if self.current_part().is_none() {
                return Some(self.current_attribute()?.qname.local());
            }
            return self.name();
        }
        match &current.event.event {
            Event::StartElement(tag) => Some(tag.name.local()),
            Event::EndElement(name) => Some(name.local()),
            _ => self.name(),
        }
    }

    /// The prefix of the name of the current node.
    pub fn prefix(&self) -> Option<&str> {
        let current = self.view()?;
        if self.cursor != Cursor::Node {
            if self.current_part().is_none() {
                return self.current_attribute()?.qname.prefix();
            }
            return None;
        }
        match &current.event.event {
            Event::StartElement(tag) => tag.name.prefix(),
            Event::EndElement(name) => name.prefix(),
            _ => None,
        }
    }

    /// The namespace URI of the current element or attribute.
    ///
    /// Namespace declarations are in the `http://www.w3.org/2000/xmlns/`
    /// namespace. Unprefixed attributes are in no namespace.
    pub fn namespace_uri(&self) -> Option<&str> {
        let current = self.view()?;
        if self.cursor != Cursor::Node {
            if self.current_part().is_some() {
                return None;
            }
            let attribute = self.current_attribute()?;
            if attribute.is_namespace_declaration() {
                return Some(XMLNS_NAMESPACE);
            }
            return self.scope.lookup(attribute.qname.prefix()?);
        }
        match &current.event.event {
            Event::StartElement(tag) => self.scope.lookup(tag.name.prefix().unwrap_or("")),
            Event::EndElement(name) => self.scope.lookup(name.prefix().unwrap_or("")),
            _ => None,
        }
    }

    /// The text value of the current node.
    ///
    /// Attributes, text of any kind, comments and processing instructions
    /// have a value.
    pub fn value(&self) -> Option<&str> {
        let current = self.view()?;
        if self.cursor != Cursor::Node {
            return match self.current_part() {
                Some(Segment::Text(text)) => Some(text.as_str()),
                Some(Segment::Reference { .. }) => None,
                None => Some(self.current_attribute()?.value.as_str()),
            };
        }
        match &current.event.event {
            Event::Text(text) | Event::CData(text) | Event::Comment(text) => Some(text.as_str()),
            Event::ProcessingInstruction { data, .. } => Some(data.as_deref().unwrap_or("")),
            _ => None,
        }
    }

    /// Whether the current node can have a value.
    pub fn has_value(&self) -> bool {
        matches!(
            self.node_type(),
            NodeType::Attribute
                | NodeType::Text
                | NodeType::CData
                | NodeType::ProcessingInstruction
                | NodeType::Comment
                | NodeType::Whitespace
                | NodeType::SignificantWhitespace
        )
    }

    /// Whether the current node is an element written as `<a/>`.
    ///
    /// False in attribute mode.
    pub fn is_empty_element(&self) -> bool {
        self.cursor == Cursor::Node && self.start_tag().map(|tag| tag.empty).unwrap_or(false)
    }

    /// Whether the current attribute was supplied by a default declaration
    /// rather than written in the start tag.
    pub fn is_default(&self) -> bool {
        self.current_part().is_none()
            && self
                .current_attribute()
                .map(|attribute| attribute.is_default)
                .unwrap_or(false)
    }

    /// Whether the current attribute is a namespace declaration.
    pub fn is_namespace_declaration(&self) -> bool {
        self.current_part().is_none()
            && self
                .current_attribute()
                .map(|attribute| attribute.is_namespace_declaration())
                .unwrap_or(false)
    }

    /// The base URI in scope: the nearest `xml:base`, otherwise the base
    /// URI the reader was made with.
    pub fn base_uri(&self) -> Option<&str> {
        match self.state {
            ReadState::Error | ReadState::Closed => None,
            _ => self.scope.base().or(self.config.base_uri.as_deref()),
        }
    }

    /// The encoding of the document.
    pub fn encoding(&self) -> Option<&str> {
        if matches!(self.state, ReadState::Error | ReadState::Closed) {
            return None;
        }
        let engine = self.engine.as_ref()?;
        engine
            .declaration()
            .and_then(|declaration| declaration.encoding.as_deref())
            .or_else(|| engine.encoding())
    }

    /// The `xml:lang` in scope.
    pub fn xml_lang(&self) -> Option<&str> {
        self.view()?;
        self.scope.xml_lang()
    }

    /// The XML version of the document; `1.0` if it does not declare one.
    pub fn xml_version(&self) -> Option<&str> {
        match self.state {
            ReadState::Initial | ReadState::Error | ReadState::Closed => None,
            _ => Some(
                self.declaration()
                    .and_then(|declaration| declaration.version.as_deref())
                    .unwrap_or("1.0"),
            ),
        }
    }

    /// The standalone status from the XML declaration.
    pub fn standalone(&self) -> Option<bool> {
        self.view()?;
        self.declaration()?.standalone
    }

    /// The quote character around attribute values.
    pub fn quote_char(&self) -> char {
        '"'
    }

    /// Whether text is normalized. Line endings and attribute value
    /// whitespace are always normalized.
    pub fn normalization(&self) -> bool {
        true
    }

    /// The document being walked, for readers made with [`Reader::walker`].
    pub(crate) fn walked_document(&self) -> Option<Rc<Document>> {
        self.engine.as_ref()?.document().cloned()
    }

    fn declaration(&self) -> Option<&Declaration> {
        self.engine.as_ref()?.declaration()
    }

    fn position(&self) -> Position {
        self.engine
            .as_ref()
            .map(|engine| engine.position())
            .unwrap_or_default()
    }

    /// The input line the parser is at.
    pub fn line_number(&self) -> u64 {
        self.position().line
    }

    /// The column on the input line the parser is at.
    pub fn column_number(&self) -> u64 {
        self.position().column
    }

    /// The number of input bytes the parser consumed.
    pub fn byte_consumed(&self) -> u64 {
        self.position().bytes
    }
}

/// ## Validation
impl<'a> Reader<'a> {
    /// Attach a RelaxNG validator, or detach with `None`.
    ///
    /// Only allowed before the first read.
    pub fn relax_ng_validate(
        &mut self,
        validator: Option<Box<dyn Validator + 'a>>,
    ) -> Result<(), Error> {
        self.attach(ValidatorKind::RelaxNg, validator)
    }

    /// Attach an XML Schema validator, or detach with `None`.
    ///
    /// Only allowed before the first read.
    pub fn schema_validate(
        &mut self,
        validator: Option<Box<dyn Validator + 'a>>,
    ) -> Result<(), Error> {
        self.attach(ValidatorKind::Schema, validator)
    }

    fn attach(
        &mut self,
        kind: ValidatorKind,
        validator: Option<Box<dyn Validator + 'a>>,
    ) -> Result<(), Error> {
        if self.state != ReadState::Initial {
            return Err(Error::InvalidState(self.state));
        }
        match validator {
            Some(validator) => {
                log::debug!("{} validator attached", kind);
                self.validator = Some(validator);
                self.validating = Some(kind);
            }
            None => {
                log::debug!("{} validator detached", kind);
                self.validator = None;
                self.validating = None;
            }
        }
        self.invalid = false;
        Ok(())
    }

    /// Receive validation messages.
    pub fn set_message_handler<F: FnMut(&ValidationMessage) + 'a>(&mut self, handler: F) {
        self.message_handler = Some(Box::new(handler));
    }

    /// Whether no validation errors were reported so far.
    ///
    /// Always false without an attached validator.
    pub fn is_valid(&self) -> bool {
        self.validating.is_some() && !self.invalid
    }

    fn run_validator(&mut self) {
        if let Some(mut validator) = self.validator.take() {
            let mut messages = Vec::new();
            validator.validate(self, &mut messages);
            self.validator = Some(validator);
            self.report(messages);
        }
    }

    fn finish_validator(&mut self) {
        if let Some(mut validator) = self.validator.take() {
            let mut messages = Vec::new();
            validator.finish(&mut messages);
            self.report(messages);
        }
    }

    fn report(&mut self, messages: Vec<ValidationMessage>) {
        let line = self.line_number();
        for mut message in messages {
            if message.line.is_none() {
                message.line = Some(line);
            }
            log::warn!(
                "validation {:?} at line {}: {}",
                message.severity,
                line,
                message.message
            );
            if message.severity.is_error() {
                self.invalid = true;
            }
            if let Some(handler) = &mut self.message_handler {
                handler(&message);
            }
        }
    }
}

impl Drop for Reader<'_> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("state", &self.state)
            .field("node_type", &self.node_type())
            .field("depth", &self.depth())
            .field("cursor", &self.cursor)
            .field("preserved", &self.preserved)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_state_is_transient() {
        let mut reader = Reader::from_str("<a/>", ReaderConfig::default()).unwrap();
        assert_eq!(reader.read_state(), ReadState::Initial);
        assert!(reader.advance().unwrap());
        assert_eq!(reader.read_state(), ReadState::Interactive);
    }

    #[test]
    fn test_failure_clears_view() {
        let mut reader = Reader::from_str("<a><b></a>", ReaderConfig::default()).unwrap();
        assert!(reader.advance().unwrap());
        assert!(reader.advance().unwrap());
        assert!(reader.advance().is_err());
        assert_eq!(reader.read_state(), ReadState::Error);
        assert!(reader.current.is_none());
        assert_eq!(reader.node_type(), NodeType::None);
        assert!(matches!(
            reader.advance(),
            Err(Error::InvalidState(ReadState::Error))
        ));
    }

    #[test]
    fn test_level_tracking() {
        let mut reader = Reader::from_str("<a><b/><c>x</c></a>", ReaderConfig::default()).unwrap();
        let mut depths = Vec::new();
        while reader.advance().unwrap() {
            depths.push(reader.depth());
        }
        assert_eq!(depths, vec![0, 1, 1, 2, 1, 0]);
        assert_eq!(reader.level, 0);
    }

    #[test]
    fn test_close_drops_engine() {
        let mut reader = Reader::from_str("<a/>", ReaderConfig::default()).unwrap();
        reader.close().unwrap();
        assert!(reader.engine.is_none());
        reader.close().unwrap();
        assert!(matches!(reader.advance(), Err(Error::Closed)));
    }
}
