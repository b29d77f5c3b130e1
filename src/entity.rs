use ahash::HashMap;
use std::borrow::Cow;

use crate::error::Error;

/// Declared general entities: name to replacement text.
pub(crate) type Entities = HashMap<String, String>;

// Nesting limit for entities referring to other entities.
const MAX_ENTITY_DEPTH: usize = 16;

/// Declared entity expansions allowed per document unless configured
/// otherwise.
pub(crate) const DEFAULT_MAX_ENTITY_EXPANSIONS: u32 = 10_000;

/// The declared entity expansions a document has left. Nested references
/// count too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExpansionBudget {
    remaining: u32,
}

impl ExpansionBudget {
    pub(crate) fn new(max: u32) -> Self {
        ExpansionBudget { remaining: max }
    }

    fn spend(&mut self, entity: &str) -> Result<(), Error> {
        match self.remaining.checked_sub(1) {
            Some(remaining) => {
                self.remaining = remaining;
                Ok(())
            }
            None => Err(Error::InvalidEntity(entity.to_string())),
        }
    }
}

impl Default for ExpansionBudget {
    fn default() -> Self {
        ExpansionBudget::new(DEFAULT_MAX_ENTITY_EXPANSIONS)
    }
}

/// A piece of character data after reference handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Text(String),
    Reference { name: String, replacement: String },
}

/// Split content on references.
///
/// Character references and the predefined entities are always expanded.
/// Declared entities are substituted when `substitute` is set, otherwise
/// they are returned as [`Segment::Reference`]. Adjacent text is merged.
pub(crate) fn split_references(
    content: &str,
    entities: &Entities,
    substitute: bool,
    budget: &mut ExpansionBudget,
) -> Result<Vec<Segment>, Error> {
    let mut segments = Vec::new();
    let mut text = String::new();
    for piece in scan(content)? {
        match piece {
            Piece::Text(s) => text.push_str(s),
            Piece::Reference(entity) => match resolve_builtin(entity)? {
                Some(c) => text.push_str(&c),
                None => {
                    let replacement = declared(entity, entities, 0, budget)?;
                    if substitute {
                        text.push_str(&replacement);
                    } else {
                        if !text.is_empty() {
                            segments.push(Segment::Text(std::mem::take(&mut text)));
                        }
                        segments.push(Segment::Reference {
                            name: entity.to_string(),
                            replacement,
                        });
                    }
                }
            },
        }
    }
    if !text.is_empty() || segments.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

/// Expand all references in content.
pub(crate) fn expand_references<'a>(
    content: &'a str,
    entities: &Entities,
    budget: &mut ExpansionBudget,
) -> Result<Cow<'a, str>, Error> {
    expand_at_depth(content, entities, 0, budget)
}

/// The full text of split content, references replaced.
pub(crate) fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.as_str(),
            Segment::Reference { replacement, .. } => replacement.as_str(),
        })
        .collect()
}

fn expand_at_depth<'a>(
    content: &'a str,
    entities: &Entities,
    depth: usize,
    budget: &mut ExpansionBudget,
) -> Result<Cow<'a, str>, Error> {
    if !content.contains('&') {
        return Ok(Cow::Borrowed(content));
    }
    let mut result = String::new();
    for piece in scan(content)? {
        match piece {
            Piece::Text(s) => result.push_str(s),
            Piece::Reference(entity) => match resolve_builtin(entity)? {
                Some(c) => result.push_str(&c),
                None => result.push_str(&declared(entity, entities, depth, budget)?),
            },
        }
    }
    Ok(result.into())
}

fn declared(
    entity: &str,
    entities: &Entities,
    depth: usize,
    budget: &mut ExpansionBudget,
) -> Result<String, Error> {
    if depth >= MAX_ENTITY_DEPTH {
        return Err(Error::InvalidEntity(entity.to_string()));
    }
    let value = entities
        .get(entity)
        .ok_or_else(|| Error::UndeclaredEntity(entity.to_string()))?;
    budget.spend(entity)?;
    Ok(expand_at_depth(value, entities, depth + 1, budget)?.into_owned())
}

enum Piece<'a> {
    Text(&'a str),
    Reference(&'a str),
}

fn scan(content: &str) -> Result<Vec<Piece<'_>>, Error> {
    let mut pieces = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find('&') {
        if start > 0 {
            pieces.push(Piece::Text(&rest[..start]));
        }
        let after = &rest[start + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| Error::UnclosedEntity(after.to_string()))?;
        pieces.push(Piece::Reference(&after[..end]));
        rest = &after[end + 1..];
    }
    if !rest.is_empty() {
        pieces.push(Piece::Text(rest));
    }
    Ok(pieces)
}

fn resolve_builtin(entity: &str) -> Result<Option<String>, Error> {
    let c = match entity {
        "amp" => '&',
        "apos" => '\'',
        "gt" => '>',
        "lt" => '<',
        "quot" => '"',
        _ => {
            let Some(number) = entity.strip_prefix('#') else {
                return Ok(None);
            };
            let code = if let Some(hex) = number.strip_prefix('x') {
                u32::from_str_radix(hex, 16)
            } else {
                number.parse::<u32>()
            }
            .map_err(|_| Error::InvalidEntity(entity.to_string()))?;
            if !is_xml_char(code) {
                return Err(Error::InvalidEntity(entity.to_string()));
            }
            char::from_u32(code).ok_or_else(|| Error::InvalidEntity(entity.to_string()))?
        }
    };
    Ok(Some(c.to_string()))
}

fn is_xml_char(code: u32) -> bool {
    matches!(code, 0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF)
}

/// Attribute value normalization: literal whitespace characters become
/// spaces. Whitespace produced by character references is left alone, so
/// this must run before references are expanded.
pub(crate) fn normalize_attribute_value(value: &str) -> Cow<str> {
    if !value.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(value);
    }
    let value = value.replace("\r\n", " ");
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect::<String>()
        .into()
}

pub(crate) fn serialize_text(content: &str) -> Cow<str> {
    escape(content, false)
}

pub(crate) fn serialize_attribute(content: &str) -> Cow<str> {
    escape(content, true)
}

fn escape(content: &str, in_attribute: bool) -> Cow<str> {
    let mut result = String::new();
    let mut entity_seen = false;
    for c in content.chars() {
        match c {
            '&' => {
                entity_seen = true;
                result.push_str("&amp;")
            }
            '<' => {
                entity_seen = true;
                result.push_str("&lt;")
            }
            '>' => {
                entity_seen = true;
                result.push_str("&gt;")
            }
            '"' if in_attribute => {
                entity_seen = true;
                result.push_str("&quot;")
            }
            _ => result.push(c),
        }
    }

    if !entity_seen {
        Cow::Borrowed(content)
    } else {
        result.into()
    }
}
