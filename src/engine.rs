//! Parse engines feeding the reader.
//!
//! An engine produces [`NodeEvent`]s in document order. The stream engine
//! parses incrementally with quick-xml; the walker engine (see
//! [`crate::walker`]) walks an already parsed [`Document`].

use std::collections::VecDeque;
use std::io::{BufRead, Read};
use std::rc::Rc;

use encoding_rs::Encoding;
use quick_xml::events::{BytesStart, Event as XmlEvent};

use crate::config::{ParserOptions, ReaderConfig};
use crate::document::{Declaration, Document};
use crate::dtd::DocumentTypeDecl;
use crate::encoding::{decode, sniff};
use crate::entity::{
    join_segments, normalize_attribute_value, split_references, ExpansionBudget, Segment,
};
use crate::error::Error;
use crate::event::{AttributeData, Event, NodeEvent, QName, StartTag};

/// Where the parser is in its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) line: u64,
    pub(crate) column: u64,
    pub(crate) bytes: u64,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            line: 1,
            column: 1,
            bytes: 0,
        }
    }
}

impl Position {
    fn advance(&mut self, consumed: &[u8]) {
        for byte in consumed {
            match byte {
                b'\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                // continuation bytes do not start a character
                byte if byte & 0xC0 == 0x80 => {}
                _ => self.column += 1,
            }
        }
        self.bytes += consumed.len() as u64;
    }
}

pub(crate) trait Engine {
    /// The next node, or `None` at the end of the document.
    fn next_event(&mut self) -> Result<Option<NodeEvent>, Error>;

    fn position(&self) -> Position;

    fn declaration(&self) -> Option<&Declaration>;

    /// The name of the encoding the input was read in.
    fn encoding(&self) -> Option<&str>;

    /// The walked document, if this engine walks one.
    fn document(&self) -> Option<&Rc<Document>> {
        None
    }

    /// Jump to the following sibling of the last produced node, skipping
    /// its subtree. `None` when there is no following sibling.
    fn next_sibling(&mut self) -> Result<Option<NodeEvent>, Error> {
        Err(Error::UnsupportedOperation("skip_to_next_sibling"))
    }
}

/// Counts what the parser consumes from a byte source.
pub(crate) struct PositionTracker<R> {
    inner: R,
    position: Position,
}

impl<R> PositionTracker<R> {
    pub(crate) fn new(inner: R) -> Self {
        PositionTracker {
            inner,
            position: Position::default(),
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }
}

impl<R: Read> Read for PositionTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.position.advance(&buf[..read]);
        Ok(read)
    }
}

impl<R: BufRead> BufRead for PositionTracker<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        // consume follows fill_buf, so this returns the buffered data
        if let Ok(buffered) = self.inner.fill_buf() {
            let amt = amt.min(buffered.len());
            self.position.advance(&buffered[..amt]);
        }
        self.inner.consume(amt)
    }
}

/// Open a byte source for streaming.
///
/// UTF-8 input is parsed as it is read. Input in any other encoding is
/// decoded up front.
pub(crate) fn open<'a, R: BufRead + 'a>(
    source: R,
    config: &ReaderConfig,
) -> Result<Box<dyn Engine + 'a>, Error> {
    let mut source = PositionTracker::new(source);
    let buffered = source.fill_buf()?;
    let encoding = sniff(buffered, config.encoding.as_deref())?;
    let bom = buffered.starts_with(b"\xEF\xBB\xBF");
    log::debug!("input encoding {}", encoding.name());
    if encoding == encoding_rs::UTF_8 {
        if bom {
            source.consume(3);
        }
        Ok(Box::new(StreamEngine::new(source, encoding, config)))
    } else {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        let decoded = decode(&data, encoding)?;
        let source = PositionTracker::new(std::io::Cursor::new(decoded.into_bytes()));
        Ok(Box::new(StreamEngine::new(source, encoding, config)))
    }
}

/// Open input already known to be UTF-8, such as a Rust string.
pub(crate) fn open_utf8<'a, R: BufRead + 'a>(
    source: R,
    config: &ReaderConfig,
) -> Box<dyn Engine + 'a> {
    Box::new(StreamEngine::new(
        PositionTracker::new(source),
        encoding_rs::UTF_8,
        config,
    ))
}

/// Incremental engine over quick-xml.
pub(crate) struct StreamEngine<R: BufRead> {
    reader: quick_xml::Reader<PositionTracker<R>>,
    buf: Vec<u8>,
    queue: VecDeque<Event>,
    // qualified names of the open elements
    open: Vec<String>,
    seen_root: bool,
    finished: bool,
    doctype: DocumentTypeDecl,
    declaration: Option<Declaration>,
    encoding: &'static Encoding,
    options: ParserOptions,
    budget: ExpansionBudget,
}

impl<R: BufRead> StreamEngine<R> {
    pub(crate) fn new(
        source: PositionTracker<R>,
        encoding: &'static Encoding,
        config: &ReaderConfig,
    ) -> Self {
        let mut reader = quick_xml::Reader::from_reader(source);
        let xml_config = reader.config_mut();
        xml_config.trim_text(false);
        // close tags are checked against our own stack
        xml_config.check_end_names = false;
        xml_config.expand_empty_elements = false;
        StreamEngine {
            reader,
            buf: Vec::new(),
            queue: VecDeque::new(),
            open: Vec::new(),
            seen_root: false,
            finished: false,
            doctype: DocumentTypeDecl::default(),
            declaration: None,
            encoding,
            options: config.options,
            budget: ExpansionBudget::new(config.max_entity_expansions),
        }
    }

    fn substitute(&self) -> bool {
        self.options.contains(ParserOptions::SUBSTITUTE_ENTITIES)
    }

    fn pull(&mut self) -> Result<(), Error> {
        self.buf.clear();
        let event = self.reader.read_event_into(&mut self.buf)?.into_owned();
        match event {
            XmlEvent::Start(start) => {
                let tag = self.start_tag(&start, false)?;
                self.open.push(tag.name.full().to_string());
                self.queue.push_back(Event::StartElement(tag));
            }
            XmlEvent::Empty(start) => {
                let tag = self.start_tag(&start, true)?;
                self.queue.push_back(Event::StartElement(tag));
            }
            XmlEvent::End(end) => {
                let name = utf8(end.name().as_ref())?.to_string();
                match self.open.pop() {
                    Some(open) if open == name => {
                        self.queue.push_back(Event::EndElement(QName::new(name)))
                    }
                    Some(open) => return Err(Error::InvalidCloseTag(open, name)),
                    None => return Err(Error::ContentOutsideRoot),
                }
            }
            XmlEvent::Text(text) => {
                let content = normalize_newlines(utf8(&text)?);
                self.text(&content)?;
            }
            XmlEvent::CData(cdata) => {
                self.check_inside_root()?;
                let content = normalize_newlines(utf8(&cdata)?);
                self.queue.push_back(Event::CData(content));
            }
            XmlEvent::Comment(comment) => {
                let content = normalize_newlines(utf8(&comment)?);
                self.queue.push_back(Event::Comment(content));
            }
            XmlEvent::PI(pi) => {
                let content = utf8(&pi)?;
                let (target, data) = match content.find(char::is_whitespace) {
                    Some(index) => (
                        &content[..index],
                        Some(content[index..].trim_start().to_string()),
                    ),
                    None => (content, None),
                };
                self.queue.push_back(Event::ProcessingInstruction {
                    target: target.to_string(),
                    data,
                });
            }
            XmlEvent::Decl(decl) => {
                let version = utf8(&decl.version().map_err(tokenizer)?)?.to_string();
                let encoding = match decl.encoding() {
                    Some(encoding) => Some(utf8(&encoding.map_err(tokenizer)?)?.to_string()),
                    None => None,
                };
                let standalone = match decl.standalone() {
                    Some(standalone) => Some(utf8(&standalone.map_err(tokenizer)?)? == "yes"),
                    None => None,
                };
                self.declaration = Some(Declaration {
                    version: Some(version),
                    encoding,
                    standalone,
                });
            }
            XmlEvent::DocType(doctype) => {
                if self.seen_root {
                    return Err(Error::ContentOutsideRoot);
                }
                self.doctype = DocumentTypeDecl::parse(utf8(&doctype)?);
                log::debug!(
                    "document type {} with {} entities",
                    self.doctype.name,
                    self.doctype.entities.len()
                );
                self.queue.push_back(Event::DocumentType {
                    name: self.doctype.name.clone(),
                });
            }
            XmlEvent::Eof => {
                if let Some(open) = self.open.last() {
                    return Err(Error::UnclosedTag(open.clone()));
                }
                if !self.seen_root {
                    return Err(Error::NoRootElement);
                }
                self.finished = true;
            }
        }
        Ok(())
    }

    fn check_inside_root(&self) -> Result<(), Error> {
        if self.open.is_empty() {
            Err(Error::ContentOutsideRoot)
        } else {
            Ok(())
        }
    }

    fn text(&mut self, content: &str) -> Result<(), Error> {
        if self.open.is_empty() {
            if is_whitespace(content) {
                return Ok(());
            }
            return Err(Error::ContentOutsideRoot);
        }
        let substitute = self.substitute();
        let segments =
            split_references(content, &self.doctype.entities, substitute, &mut self.budget)?;
        for segment in segments {
            match segment {
                Segment::Text(text) if text.is_empty() => {}
                Segment::Text(text) => self.queue.push_back(Event::Text(text)),
                Segment::Reference { name, replacement } => self
                    .queue
                    .push_back(Event::EntityReference { name, replacement }),
            }
        }
        Ok(())
    }

    fn start_tag(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<StartTag, Error> {
        if self.open.is_empty() {
            if self.seen_root {
                return Err(Error::ContentOutsideRoot);
            }
            self.seen_root = true;
        }
        let name = QName::new(utf8(start.name().as_ref())?.to_string());
        let mut attributes: Vec<AttributeData> = Vec::new();
        let mut raw_attributes = start.attributes();
        raw_attributes.with_checks(false);
        for attribute in raw_attributes {
            let attribute = attribute.map_err(tokenizer)?;
            let qname = utf8(attribute.key.as_ref())?;
            if attributes.iter().any(|a| a.qname.full() == qname) {
                return Err(Error::DuplicateAttribute(qname.to_string()));
            }
            let value = utf8(&attribute.value)?;
            attributes.push(self.attribute(qname, value, false)?);
        }
        if self.options.contains(ParserOptions::DEFAULT_ATTRIBUTES) {
            for default in self.doctype.defaults_for(name.full()).to_vec() {
                if !attributes.iter().any(|a| a.qname.full() == default.name) {
                    attributes.push(self.attribute(&default.name, &default.value, true)?);
                }
            }
        }
        Ok(StartTag {
            name,
            attributes,
            empty,
        })
    }

    fn attribute(
        &mut self,
        qname: &str,
        raw: &str,
        is_default: bool,
    ) -> Result<AttributeData, Error> {
        let normalized = normalize_attribute_value(raw);
        let substitute = self.substitute();
        let parts =
            split_references(&normalized, &self.doctype.entities, substitute, &mut self.budget)?;
        let value = join_segments(&parts);
        Ok(AttributeData {
            qname: QName::new(qname.to_string()),
            value,
            parts,
            is_default,
        })
    }
}

impl<R: BufRead> Engine for StreamEngine<R> {
    fn next_event(&mut self) -> Result<Option<NodeEvent>, Error> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(NodeEvent::new(event)));
            }
            if self.finished {
                return Ok(None);
            }
            self.pull()?;
        }
    }

    fn position(&self) -> Position {
        self.reader.get_ref().position()
    }

    fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    fn encoding(&self) -> Option<&str> {
        Some(self.encoding.name())
    }
}

fn tokenizer<E: Into<quick_xml::Error>>(error: E) -> Error {
    Error::Tokenizer(error.into())
}

fn utf8(bytes: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(bytes).map_err(|_| Error::Encoding("UTF-8".to_string()))
}

pub(crate) fn is_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

pub(crate) fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}
