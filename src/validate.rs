use crate::nodetype::Severity;
use crate::reader::Reader;

/// A message reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    /// How serious the problem is.
    pub severity: Severity,
    /// A description of the problem.
    pub message: String,
    /// The input line the reader was at. Filled in by the reader when the
    /// validator leaves it out.
    pub line: Option<u64>,
}

impl ValidationMessage {
    /// Create a message without a line number.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        ValidationMessage {
            severity,
            message: message.into(),
            line: None,
        }
    }
}

/// A validator driven by a [`Reader`].
///
/// Validation engines themselves live outside this crate; implement this
/// trait to connect one. Attach it with
/// [`Reader::relax_ng_validate`] or [`Reader::schema_validate`] before the
/// first read.
///
/// ```rust
/// use xotreader::{NodeType, Reader, Severity, ValidationMessage, Validator};
///
/// // Rejects any element called "forbidden".
/// struct NoForbidden;
///
/// impl Validator for NoForbidden {
///     fn validate(&mut self, reader: &Reader<'_>, messages: &mut Vec<ValidationMessage>) {
///         if reader.node_type() == NodeType::Element && reader.name() == Some("forbidden") {
///             messages.push(ValidationMessage::new(Severity::ValidityError, "forbidden element"));
///         }
///     }
/// }
///
/// let mut reader = Reader::from_str("<a><forbidden/></a>", Default::default())?;
/// reader.relax_ng_validate(Some(Box::new(NoForbidden)))?;
/// while reader.advance()? {}
/// assert!(!reader.is_valid());
/// # Ok::<(), xotreader::Error>(())
/// ```
pub trait Validator {
    /// Inspect the node the reader just moved to.
    fn validate(&mut self, reader: &Reader<'_>, messages: &mut Vec<ValidationMessage>);

    /// Called once at the end of the document, or when the reader is closed
    /// before that.
    fn finish(&mut self, messages: &mut Vec<ValidationMessage>) {
        let _ = messages;
    }
}

/// The kind of validator attached, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidatorKind {
    RelaxNg,
    Schema,
}

impl std::fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidatorKind::RelaxNg => write!(f, "RelaxNG"),
            ValidatorKind::Schema => write!(f, "XML Schema"),
        }
    }
}
