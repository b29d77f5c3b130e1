//! Declarations from the internal subset of a document type declaration.
//!
//! Only what the reader needs is collected: internal general entities and
//! attribute defaults. External entities are recorded with empty
//! replacement text, since external resources are never fetched.

use ahash::HashMap;

use crate::entity::Entities;

/// A default attribute value declared in an `<!ATTLIST>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeDefault {
    pub(crate) name: String,
    pub(crate) value: String,
}

#[derive(Debug, Default)]
pub(crate) struct DocumentTypeDecl {
    pub(crate) name: String,
    pub(crate) entities: Entities,
    pub(crate) attribute_defaults: HashMap<String, Vec<AttributeDefault>>,
}

impl DocumentTypeDecl {
    /// Parse the content of `<!DOCTYPE ...>`, without the keyword.
    pub(crate) fn parse(content: &str) -> Self {
        let mut scanner = Scanner::new(content);
        scanner.skip_whitespace();
        let name = scanner.name().to_string();
        let mut decl = DocumentTypeDecl {
            name,
            ..Default::default()
        };
        if let Some(start) = content.find('[') {
            let end = content.rfind(']').unwrap_or(content.len());
            if end > start {
                decl.scan_subset(&content[start + 1..end]);
            }
        }
        decl
    }

    /// Declared defaults for an element.
    pub(crate) fn defaults_for(&self, element: &str) -> &[AttributeDefault] {
        self.attribute_defaults
            .get(element)
            .map(|defaults| defaults.as_slice())
            .unwrap_or(&[])
    }

    fn scan_subset(&mut self, subset: &str) {
        let mut scanner = Scanner::new(subset);
        loop {
            scanner.skip_whitespace();
            if scanner.is_done() {
                break;
            }
            if scanner.eat("<!--") {
                scanner.skip_past("-->");
            } else if scanner.eat("<!ENTITY") {
                self.entity(&mut scanner);
            } else if scanner.eat("<!ATTLIST") {
                self.attlist(&mut scanner);
            } else if scanner.eat("<?") {
                scanner.skip_past("?>");
            } else {
                // element, notation declarations and parameter entity references
                scanner.skip_declaration();
            }
        }
    }

    fn entity(&mut self, scanner: &mut Scanner) {
        scanner.skip_whitespace();
        if scanner.eat("%") {
            // parameter entities only matter for DTD processing
            scanner.skip_declaration();
            return;
        }
        let name = scanner.name().to_string();
        scanner.skip_whitespace();
        let value = if let Some(value) = scanner.quoted() {
            value.to_string()
        } else {
            String::new()
        };
        scanner.skip_declaration();
        // first declaration is binding
        if !name.is_empty() {
            self.entities.entry(name).or_insert(value);
        }
    }

    fn attlist(&mut self, scanner: &mut Scanner) {
        scanner.skip_whitespace();
        let element = scanner.name().to_string();
        loop {
            scanner.skip_whitespace();
            if scanner.is_done() || scanner.eat(">") {
                break;
            }
            let attribute = scanner.name().to_string();
            if attribute.is_empty() {
                scanner.skip_declaration();
                break;
            }
            scanner.skip_whitespace();
            // attribute type
            if scanner.eat("NOTATION") {
                scanner.skip_whitespace();
            }
            if scanner.eat("(") {
                scanner.skip_past(")");
            } else {
                scanner.name();
            }
            scanner.skip_whitespace();
            let value = if scanner.eat("#REQUIRED") || scanner.eat("#IMPLIED") {
                None
            } else {
                scanner.eat("#FIXED");
                scanner.skip_whitespace();
                scanner.quoted().map(|value| value.to_string())
            };
            if let Some(value) = value {
                let defaults = self.attribute_defaults.entry(element.clone()).or_default();
                if !defaults.iter().any(|default| default.name == attribute) {
                    defaults.push(AttributeDefault {
                        name: attribute,
                        value,
                    });
                }
            }
        }
    }
}

struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(content: &'a str) -> Self {
        Scanner { rest: content }
    }

    fn is_done(&self) -> bool {
        self.rest.is_empty()
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, token: &str) -> bool {
        if let Some(rest) = self.rest.strip_prefix(token) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    fn skip_past(&mut self, token: &str) {
        self.rest = match self.rest.find(token) {
            Some(index) => &self.rest[index + token.len()..],
            None => "",
        };
    }

    // Skip to the closing '>' of a declaration, stepping over quoted literals.
    fn skip_declaration(&mut self) {
        let mut quote = None;
        for (index, c) in self.rest.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '>') => {
                    self.rest = &self.rest[index + 1..];
                    return;
                }
                _ => {}
            }
        }
        self.rest = "";
    }

    fn name(&mut self) -> &'a str {
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '[' | '(' | '"' | '\''))
            .unwrap_or(self.rest.len());
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        name
    }

    fn quoted(&mut self) -> Option<&'a str> {
        let quote = self.rest.chars().next().filter(|c| matches!(c, '"' | '\''))?;
        let body = &self.rest[1..];
        let end = body.find(quote)?;
        self.rest = &body[end + 1..];
        Some(&body[..end])
    }
}
