#![forbid(unsafe_code)]

//! A cursor-based pull reader for XML.
//!
//! A [`Reader`] moves forward through a document one node at a time. At each
//! position you can inspect the node, visit its attributes and resolve
//! namespace prefixes in its scope. When you need a whole element at once,
//! [`Reader::expand`] materializes it into a [`Subtree`] that stays valid as
//! the reader moves on.
//!
//! ```rust
//! use xotreader::{NodeType, Reader, ReaderConfig};
//!
//! let xml = r#"<items><item id="1">one</item><item id="2">two</item></items>"#;
//! let mut reader = Reader::from_str(xml, ReaderConfig::default())?;
//! let mut items = Vec::new();
//! while reader.advance()? {
//!     if reader.node_type() == NodeType::Element && reader.name() == Some("item") {
//!         let id = reader.attribute("id").unwrap_or_default().to_string();
//!         let item = reader.expand().unwrap();
//!         items.push((id, item.text_content()));
//!     }
//! }
//! assert_eq!(items, vec![
//!     ("1".to_string(), "one".to_string()),
//!     ("2".to_string(), "two".to_string()),
//! ]);
//! # Ok::<(), xotreader::Error>(())
//! ```
//!
//! Readers are made from a string ([`Reader::from_str`]), any byte stream
//! ([`Reader::from_reader`]), a file ([`Reader::from_file`]) or a parsed
//! [`Document`] ([`Reader::walker`]).

mod access;
mod attribute;
mod builder;
mod config;
mod creation;
mod document;
mod dtd;
mod encoding;
mod engine;
mod entity;
mod error;
mod event;
mod expand;
mod intern;
mod nodetype;
mod parse;
mod reader;
mod scope;
mod serialize;
mod validate;
mod walker;
mod xmlvalue;

pub use access::NodeEdge;
pub use attribute::AttributeKey;
pub use config::{ParserOptions, ReaderConfig};
pub use document::{Declaration, Document, Node};
pub use error::Error;
pub use expand::Subtree;
pub use intern::{NameId, NamespaceId, PrefixId};
pub use nodetype::{NodeType, ReadState, Severity};
pub use reader::Reader;
pub use validate::{ValidationMessage, Validator};
pub use xmlvalue::{
    Attribute, Comment, Element, Prefixes, ProcessingInstruction, Text, Value, ValueType,
};
