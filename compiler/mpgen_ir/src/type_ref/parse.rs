//! Recursive-descent parser for rendered type references.
//!
//! Grammar:
//!
//! ```text
//! type     := base suffix*
//! base     := '(' type (',' type)+ ')'
//!           | path ('<' type (',' type)* '>')?
//! suffix   := '?' | '[' ','* ']'
//! path     := ident ('.' ident)*
//! ```
//!
//! Every named type parses as `TypeRef::Named`; turning in-scope names into
//! `TypeRef::Param` is the job of the metadata snapshot, which knows the
//! declared type parameters.

use super::{ParseTypeError, TypeRef};

pub(super) fn parse(text: &str) -> Result<TypeRef, ParseTypeError> {
    let mut parser = Parser { src: text, pos: 0 };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn parse_type(&mut self) -> Result<TypeRef, ParseTypeError> {
        self.skip_ws();
        let mut ty = if self.eat('(') {
            self.parse_tuple()?
        } else {
            self.parse_named()?
        };

        loop {
            self.skip_ws();
            if self.eat('?') {
                ty = TypeRef::nullable(ty);
            } else if self.eat('[') {
                let mut rank = 1;
                loop {
                    self.skip_ws();
                    if self.eat(',') {
                        rank += 1;
                    } else {
                        break;
                    }
                }
                if !self.eat(']') {
                    return Err(self.error("expected `]`"));
                }
                ty = TypeRef::array(ty, rank);
            } else {
                return Ok(ty);
            }
        }
    }

    fn parse_tuple(&mut self) -> Result<TypeRef, ParseTypeError> {
        let elements = self.parse_list(')')?;
        if elements.len() < 2 {
            return Err(self.error("a tuple needs at least two elements"));
        }
        Ok(TypeRef::Tuple(elements))
    }

    fn parse_named(&mut self) -> Result<TypeRef, ParseTypeError> {
        let start = self.pos;
        let rest = &self.src[start..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());
        let name = &rest[..len];
        if name.is_empty() || name.starts_with('.') || name.ends_with('.') || name.contains("..")
        {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;

        self.skip_ws();
        let args = if self.eat('<') {
            self.parse_list('>')?
        } else {
            Vec::new()
        };
        Ok(TypeRef::generic(name, args))
    }

    /// Parse `type (',' type)* close`; the opening delimiter is already consumed.
    fn parse_list(&mut self, close: char) -> Result<Vec<TypeRef>, ParseTypeError> {
        let mut items = vec![self.parse_type()?];
        loop {
            self.skip_ws();
            if self.eat(',') {
                items.push(self.parse_type()?);
            } else if self.eat(close) {
                return Ok(items);
            } else {
                return Err(self.error(if close == '>' {
                    "expected `,` or `>`"
                } else {
                    "expected `,` or `)`"
                }));
            }
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.src[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, message: &'static str) -> ParseTypeError {
        ParseTypeError {
            input: self.src.to_string(),
            offset: self.pos,
            message,
        }
    }
}
