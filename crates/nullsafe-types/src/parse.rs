//! Parsing of type names.
//!
//! Grammar (whitespace insignificant):
//!
//! ```text
//! type   := ident ( '<' type ( ',' type )* '>' )? suffix*
//! suffix := '?' | '[' ']'
//! ```
//!
//! `ident` is either an intrinsic keyword (`int`, `string`, `DateTime`, ...)
//! or the name of a registered definition.

use crate::intern::TypeInterner;
use crate::types::{IntrinsicKind, TypeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("unexpected end of type name `{input}`")]
    UnexpectedEnd { input: String },

    #[error("unexpected character `{found}` at offset {offset} in `{input}`")]
    UnexpectedChar {
        found: char,
        offset: usize,
        input: String,
    },

    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error("`{name}` expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Parse a type name against the definitions registered in `db`.
pub fn parse_type(db: &TypeInterner, input: &str) -> Result<TypeId, TypeParseError> {
    let mut parser = TypeNameParser { db, input, pos: 0 };
    let ty = parser.parse_type()?;
    parser.skip_whitespace();
    match parser.peek() {
        Some(_) => Err(parser.unexpected()),
        None => Ok(ty),
    }
}

struct TypeNameParser<'a> {
    db: &'a TypeInterner,
    input: &'a str,
    pos: usize,
}

impl<'a> TypeNameParser<'a> {
    fn parse_type(&mut self) -> Result<TypeId, TypeParseError> {
        self.skip_whitespace();
        let name = self.parse_ident()?;

        let mut args = Vec::new();
        self.skip_whitespace();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                self.skip_whitespace();
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.unexpected());
            }
        }

        let mut ty = self.resolve(name, &args)?;
        loop {
            self.skip_whitespace();
            if self.eat('?') {
                ty = self.db.nullable(ty);
            } else if self.eat('[') {
                self.skip_whitespace();
                if !self.eat(']') {
                    return Err(self.unexpected());
                }
                ty = self.db.array(ty);
            } else {
                return Ok(ty);
            }
        }
    }

    fn resolve(&self, name: &str, args: &[TypeId]) -> Result<TypeId, TypeParseError> {
        if let Some(kind) = IntrinsicKind::from_name(name) {
            if !args.is_empty() {
                return Err(TypeParseError::ArityMismatch {
                    name: name.to_string(),
                    expected: 0,
                    found: args.len(),
                });
            }
            return Ok(kind.to_type_id());
        }

        let defs = self.db.definitions();
        let def = defs.lookup(name).ok_or_else(|| TypeParseError::UnknownType {
            name: name.to_string(),
        })?;
        let expected = defs.get_arity(def).unwrap_or(0);
        if expected != args.len() {
            return Err(TypeParseError::ArityMismatch {
                name: name.to_string(),
                expected,
                found: args.len(),
            });
        }
        Ok(self.db.generic(def, args))
    }

    fn parse_ident(&mut self) -> Result<&'a str, TypeParseError> {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(&input[start..self.pos])
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn unexpected(&self) -> TypeParseError {
        match self.peek() {
            Some(found) => TypeParseError::UnexpectedChar {
                found,
                offset: self.pos,
                input: self.input.to_string(),
            },
            None => TypeParseError::UnexpectedEnd {
                input: self.input.to_string(),
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/parse_tests.rs"]
mod tests;
