#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The type of the node the reader is positioned on.
///
/// The integer identities returned by [`NodeType::id`] are stable; they follow
/// the `XmlNodeType` numbering used by pull readers in other environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeType {
    /// Not positioned on a node.
    None,
    /// Element start tag, or an empty element.
    Element,
    /// Attribute, including namespace declarations.
    Attribute,
    /// Text content.
    Text,
    /// CDATA section.
    CData,
    /// Reference to a general entity that was not substituted.
    EntityReference,
    /// Entity declaration.
    Entity,
    /// Processing instruction.
    ProcessingInstruction,
    /// Comment.
    Comment,
    /// Document node.
    Document,
    /// Document type declaration.
    DocumentType,
    /// Document fragment.
    DocumentFragment,
    /// Notation declaration.
    Notation,
    /// Whitespace-only text where whitespace is not significant.
    Whitespace,
    /// Whitespace-only text under `xml:space="preserve"`.
    SignificantWhitespace,
    /// Element end tag.
    EndElement,
    /// End of an entity expansion.
    EndEntity,
    /// XML declaration.
    XmlDeclaration,
}

impl NodeType {
    /// Stable integer identity of the node type.
    pub fn id(self) -> i32 {
        match self {
            NodeType::None => 0,
            NodeType::Element => 1,
            NodeType::Attribute => 2,
            NodeType::Text => 3,
            NodeType::CData => 4,
            NodeType::EntityReference => 5,
            NodeType::Entity => 6,
            NodeType::ProcessingInstruction => 7,
            NodeType::Comment => 8,
            NodeType::Document => 9,
            NodeType::DocumentType => 10,
            NodeType::DocumentFragment => 11,
            NodeType::Notation => 12,
            NodeType::Whitespace => 13,
            NodeType::SignificantWhitespace => 14,
            NodeType::EndElement => 15,
            NodeType::EndEntity => 16,
            NodeType::XmlDeclaration => 17,
        }
    }
}

impl TryFrom<i32> for NodeType {
    type Error = i32;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Ok(match id {
            0 => NodeType::None,
            1 => NodeType::Element,
            2 => NodeType::Attribute,
            3 => NodeType::Text,
            4 => NodeType::CData,
            5 => NodeType::EntityReference,
            6 => NodeType::Entity,
            7 => NodeType::ProcessingInstruction,
            8 => NodeType::Comment,
            9 => NodeType::Document,
            10 => NodeType::DocumentType,
            11 => NodeType::DocumentFragment,
            12 => NodeType::Notation,
            13 => NodeType::Whitespace,
            14 => NodeType::SignificantWhitespace,
            15 => NodeType::EndElement,
            16 => NodeType::EndEntity,
            17 => NodeType::XmlDeclaration,
            _ => return Err(id),
        })
    }
}

/// The read state of a [`Reader`](crate::Reader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReadState {
    /// Constructed; nothing has been read yet.
    Initial,
    /// Positioned on a node.
    Interactive,
    /// A read failed. The reader cannot recover from this.
    Error,
    /// The end of the document was reached.
    EndOfFile,
    /// The reader was closed.
    Closed,
    /// A node is being fetched from the underlying engine.
    Reading,
}

impl ReadState {
    /// Stable integer identity of the read state.
    pub fn id(self) -> i32 {
        match self {
            ReadState::Initial => 0,
            ReadState::Interactive => 1,
            ReadState::Error => 2,
            ReadState::EndOfFile => 3,
            ReadState::Closed => 4,
            ReadState::Reading => 5,
        }
    }
}

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// Validity warning
    ValidityWarning,
    /// Validity error
    ValidityError,
    /// Warning
    Warning,
    /// Error
    Error,
}

impl Severity {
    /// Stable integer identity of the severity.
    pub fn id(self) -> i32 {
        match self {
            Severity::ValidityWarning => 1,
            Severity::ValidityError => 2,
            Severity::Warning => 3,
            Severity::Error => 4,
        }
    }

    /// Whether a message of this severity makes the document invalid.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::ValidityError | Severity::Error)
    }
}
