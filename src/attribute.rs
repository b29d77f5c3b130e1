use crate::entity::Segment;
use crate::error::Error;
use crate::intern::XMLNS_NAMESPACE;
use crate::nodetype::ReadState;
use crate::reader::{Cursor, Reader};

/// Identifies an attribute of the current element: by position, or by
/// qualified name as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKey<'k> {
    Index(usize),
    Name(&'k str),
}

impl From<usize> for AttributeKey<'_> {
    fn from(index: usize) -> Self {
        AttributeKey::Index(index)
    }
}

impl<'k> From<&'k str> for AttributeKey<'k> {
    fn from(name: &'k str) -> Self {
        AttributeKey::Name(name)
    }
}

/// ## Attributes
///
/// Namespace declarations count as attributes, in the order the engine
/// reports them.
impl<'a> Reader<'a> {
    fn attribute_index(&self, key: AttributeKey<'_>) -> Option<usize> {
        let attributes = &self.start_tag()?.attributes;
        match key {
            AttributeKey::Index(index) => (index < attributes.len()).then_some(index),
            AttributeKey::Name(name) => attributes
                .iter()
                .position(|attribute| attribute.qname.full() == name),
        }
    }

    fn attribute_index_ns(&self, local_name: &str, namespace_uri: &str) -> Option<usize> {
        self.start_tag()?.attributes.iter().position(|attribute| {
            if attribute.qname.local() != local_name && !attribute.is_namespace_declaration() {
                return false;
            }
            if attribute.is_namespace_declaration() {
                // xmlns has local name "xmlns", xmlns:p has local name "p"
                return namespace_uri == XMLNS_NAMESPACE && attribute.qname.local() == local_name;
            }
            match attribute.qname.prefix() {
                Some(prefix) => self.scope.lookup(prefix) == Some(namespace_uri),
                None => namespace_uri.is_empty(),
            }
        })
    }

    /// The number of attributes of the current element, namespace
    /// declarations included. Also the element's count in attribute mode.
    pub fn attribute_count(&self) -> usize {
        self.start_tag()
            .map(|tag| tag.attributes.len())
            .unwrap_or(0)
    }

    /// Whether the current element has attributes.
    pub fn has_attributes(&self) -> bool {
        self.attribute_count() > 0
    }

    /// The value of an attribute of the current element.
    ///
    /// ```rust
    /// use xotreader::{Reader, ReaderConfig};
    ///
    /// let mut reader = Reader::from_str(r#"<a x="1" y="2"/>"#, ReaderConfig::default())?;
    /// reader.advance()?;
    /// assert_eq!(reader.attribute("y"), Some("2"));
    /// assert_eq!(reader.attribute(0), Some("1"));
    /// assert_eq!(reader.attribute("z"), None);
    /// # Ok::<(), xotreader::Error>(())
    /// ```
    pub fn attribute<'k>(&self, key: impl Into<AttributeKey<'k>>) -> Option<&str> {
        let index = self.attribute_index(key.into())?;
        Some(self.start_tag()?.attributes[index].value.as_str())
    }

    /// The value of an attribute by local name and namespace URI. An
    /// empty namespace URI selects unprefixed attributes.
    pub fn attribute_ns(&self, local_name: &str, namespace_uri: &str) -> Option<&str> {
        let index = self.attribute_index_ns(local_name, namespace_uri)?;
        Some(self.start_tag()?.attributes[index].value.as_str())
    }

    /// Move to an attribute of the current element.
    ///
    /// Returns false and stays put if there is no such attribute.
    pub fn move_to_attribute<'k>(&mut self, key: impl Into<AttributeKey<'k>>) -> bool {
        self.move_to(self.attribute_index(key.into()))
    }

    /// Move to an attribute by local name and namespace URI.
    pub fn move_to_attribute_ns(&mut self, local_name: &str, namespace_uri: &str) -> bool {
        self.move_to(self.attribute_index_ns(local_name, namespace_uri))
    }

    /// Move to the first attribute of the current element.
    pub fn move_to_first_attribute(&mut self) -> bool {
        self.move_to(self.attribute_index(AttributeKey::Index(0)))
    }

    /// Move to the next attribute; from the element itself this is the
    /// first attribute.
    pub fn move_to_next_attribute(&mut self) -> bool {
        let next = match self.cursor {
            Cursor::Node => 0,
            Cursor::Attribute(index) | Cursor::AttributeValue { index, .. } => index + 1,
        };
        self.move_to(self.attribute_index(AttributeKey::Index(next)))
    }

    fn move_to(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(index) => {
                self.cursor = Cursor::Attribute(index);
                true
            }
            None => false,
        }
    }

    /// Leave attribute mode and return to the element.
    ///
    /// Outside attribute mode this does nothing and succeeds, also before
    /// the first read. Returns false only after a failure or close.
    pub fn move_to_element(&mut self) -> bool {
        if matches!(self.state, ReadState::Error | ReadState::Closed) {
            return false;
        }
        self.cursor = Cursor::Node;
        true
    }

    /// Step into the value of the current attribute.
    ///
    /// The value is visited as a sequence of text and entity reference
    /// nodes. Returns `Ok(false)` when the value is exhausted, or when the
    /// reader is not on an attribute.
    pub fn read_attribute_value(&mut self) -> Result<bool, Error> {
        match self.state {
            ReadState::Closed => return Err(Error::Closed),
            ReadState::Error => return Err(Error::InvalidState(ReadState::Error)),
            _ => {}
        }
        let Some(attribute) = self.current_attribute() else {
            return Ok(false);
        };
        let parts = attribute.parts.len();
        match self.cursor {
            Cursor::Attribute(index) if parts > 0 => {
                self.cursor = Cursor::AttributeValue { index, part: 0 };
                Ok(true)
            }
            Cursor::AttributeValue { index, part } if part + 1 < parts => {
                self.cursor = Cursor::AttributeValue {
                    index,
                    part: part + 1,
                };
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// The replacement text of the entity reference the attribute value
    /// cursor is on.
    pub(crate) fn attribute_part_replacement(&self) -> Option<&str> {
        let Cursor::AttributeValue { part, .. } = self.cursor else {
            return None;
        };
        match self.current_attribute()?.parts.get(part)? {
            Segment::Reference { replacement, .. } => Some(replacement.as_str()),
            Segment::Text(_) => None,
        }
    }

    /// Resolve a prefix in the scope of the current node. `None` resolves
    /// the default namespace.
    pub fn lookup_namespace(&self, prefix: Option<&str>) -> Option<&str> {
        self.view()?;
        self.scope.lookup(prefix.unwrap_or(""))
    }
}
