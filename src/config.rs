use std::ops::{BitOr, BitOrAssign};

use crate::entity::DEFAULT_MAX_ENTITY_EXPANSIONS;

/// Parser option flags.
///
/// Flags combine with `|`:
///
/// ```rust
/// use xotreader::ParserOptions;
///
/// let options = ParserOptions::DEFAULT_ATTRIBUTES | ParserOptions::SUBSTITUTE_ENTITIES;
/// assert!(options.contains(ParserOptions::SUBSTITUTE_ENTITIES));
/// assert!(!options.contains(ParserOptions::VALIDATE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParserOptions(u32);

impl ParserOptions {
    /// Load the external DTD subset. External resources are never fetched,
    /// so this is recorded only.
    pub const LOAD_EXTERNAL_SUBSET: ParserOptions = ParserOptions(1);
    /// Add attributes that have a default value in the internal DTD subset.
    pub const DEFAULT_ATTRIBUTES: ParserOptions = ParserOptions(2);
    /// Request validation. Validation itself is done by an attached
    /// [`Validator`](crate::Validator).
    pub const VALIDATE: ParserOptions = ParserOptions(4);
    /// Substitute declared general entities instead of reporting entity
    /// reference nodes.
    pub const SUBSTITUTE_ENTITIES: ParserOptions = ParserOptions(8);

    const ALL: u32 = 1 | 2 | 4 | 8;

    /// No options.
    pub const fn empty() -> Self {
        ParserOptions(0)
    }

    /// Options from an integer bitmask; unknown bits are dropped.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        ParserOptions(bits & Self::ALL)
    }

    /// The integer bitmask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether all flags in `other` are set.
    pub const fn contains(self, other: ParserOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ParserOptions {
    type Output = ParserOptions;

    fn bitor(self, rhs: Self) -> Self::Output {
        ParserOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for ParserOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Configuration passed to a reader at construction.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Base URI of the document.
    pub base_uri: Option<String>,
    /// Encoding label overriding detection.
    pub encoding: Option<String>,
    /// Parser options.
    pub options: ParserOptions,
    /// How many declared entity references may be expanded in the whole
    /// document, nested references included (default: 10,000). Reading
    /// past the limit fails with [`Error::InvalidEntity`](crate::Error::InvalidEntity).
    pub max_entity_expansions: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            base_uri: None,
            encoding: None,
            options: ParserOptions::empty(),
            max_entity_expansions: DEFAULT_MAX_ENTITY_EXPANSIONS,
        }
    }
}

impl ReaderConfig {
    /// Set the base URI.
    pub fn with_base_uri<S: Into<String>>(mut self, base_uri: S) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Set the encoding override.
    pub fn with_encoding<S: Into<String>>(mut self, encoding: S) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Set the parser options.
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the limit on declared entity expansions.
    pub fn with_max_entity_expansions(mut self, max: u32) -> Self {
        self.max_entity_expansions = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_unknown_bits() {
        let options = ParserOptions::from_bits_truncate(0xff);
        assert_eq!(options.bits(), 15);
        assert!(options.contains(ParserOptions::LOAD_EXTERNAL_SUBSET | ParserOptions::VALIDATE));
    }

    #[test]
    fn test_empty_contains_nothing() {
        assert!(!ParserOptions::empty().contains(ParserOptions::DEFAULT_ATTRIBUTES));
        assert!(ParserOptions::empty().contains(ParserOptions::empty()));
    }

    #[test]
    fn test_builder() {
        let config = ReaderConfig::default()
            .with_base_uri("http://example.com/doc.xml")
            .with_encoding("latin1")
            .with_options(ParserOptions::SUBSTITUTE_ENTITIES);
        assert_eq!(config.base_uri.as_deref(), Some("http://example.com/doc.xml"));
        assert_eq!(config.encoding.as_deref(), Some("latin1"));
        assert_eq!(config.options, ParserOptions::SUBSTITUTE_ENTITIES);
        assert_eq!(config.max_entity_expansions, 10_000);
        let config = config.with_max_entity_expansions(5);
        assert_eq!(config.max_entity_expansions, 5);
    }
}
