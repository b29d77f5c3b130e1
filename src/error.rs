use std::fmt::{Display, Formatter};

use crate::nodetype::ReadState;

/// Xotreader errors
#[derive(Debug)]
pub enum Error {
    /// The input could not be opened or read.
    Io(std::io::Error),
    /// The encoding label is not known.
    UnknownEncoding(String),
    /// The input is not valid in its encoding.
    Encoding(String),
    /// The streaming tokenizer reported a well-formedness error.
    Tokenizer(quick_xml::Error),
    /// The tree tokenizer reported a well-formedness error.
    Parser(xmlparser::Error),
    /// The close tag does not match the open tag. Holds the expected and
    /// the actual name.
    InvalidCloseTag(String, String),
    /// An element was still open at the end of the input.
    UnclosedTag(String),
    /// A prefix was used that has no namespace declaration in scope.
    UnknownPrefix(String),
    /// The same attribute appears twice on an element.
    DuplicateAttribute(String),
    /// An entity reference lacks its closing `;`.
    UnclosedEntity(String),
    /// An entity or character reference cannot be interpreted.
    InvalidEntity(String),
    /// A general entity is referenced without a declaration.
    UndeclaredEntity(String),
    /// The document has no document element.
    NoRootElement,
    /// Non-whitespace content, or a second element, outside the document
    /// element.
    ContentOutsideRoot,
    /// The operation is not available for how this reader was constructed.
    UnsupportedOperation(&'static str),
    /// The operation is not allowed in the current read state.
    InvalidState(ReadState),
    /// The reader has been closed.
    Closed,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::UnknownEncoding(label) => write!(f, "unknown encoding: {}", label),
            Error::Encoding(msg) => write!(f, "encoding error: {}", msg),
            Error::Tokenizer(e) => write!(f, "XML error: {}", e),
            Error::Parser(e) => write!(f, "XML error: {}", e),
            Error::InvalidCloseTag(expected, found) => {
                write!(f, "expected close tag </{}>, found </{}>", expected, found)
            }
            Error::UnclosedTag(name) => write!(f, "unclosed tag <{}>", name),
            Error::UnknownPrefix(prefix) => write!(f, "unknown prefix: {}", prefix),
            Error::DuplicateAttribute(name) => write!(f, "duplicate attribute: {}", name),
            Error::UnclosedEntity(entity) => write!(f, "unclosed entity: &{}", entity),
            Error::InvalidEntity(entity) => write!(f, "invalid entity: &{};", entity),
            Error::UndeclaredEntity(entity) => write!(f, "entity '{}' not defined", entity),
            Error::NoRootElement => write!(f, "document has no root element"),
            Error::ContentOutsideRoot => write!(f, "content outside of the root element"),
            Error::UnsupportedOperation(op) => write!(f, "unsupported operation: {}", op),
            Error::InvalidState(state) => write!(f, "not allowed in read state {:?}", state),
            Error::Closed => write!(f, "reader is closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Tokenizer(e) => Some(e),
            Error::Parser(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Parser(e)
    }
}

impl From<quick_xml::Error> for Error {
    #[inline]
    fn from(e: quick_xml::Error) -> Self {
        Error::Tokenizer(e)
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
