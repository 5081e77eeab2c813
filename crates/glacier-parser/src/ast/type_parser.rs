//! Type parsing.

use super::parser::Parser;
use super::{ParseError, Type};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a type.
    ///
    /// Grammar: `'int' | 'string' | 'void' | 'vector' '<' TYPE '>'
    /// | 'map' '<' TYPE ',' TYPE '>' | IDENTIFIER`
    pub fn parse_type(&mut self) -> Result<Type<'ast>, ParseError> {
        let token = *self.peek();
        let ty = match token.kind {
            TokenKind::Int => {
                self.advance();
                Type::Int
            }
            TokenKind::String => {
                self.advance();
                Type::String
            }
            TokenKind::Void => {
                self.advance();
                Type::Void
            }
            TokenKind::Identifier => {
                self.advance();
                Type::User(token.lexeme)
            }
            TokenKind::Vector => {
                self.advance();
                self.expect(TokenKind::Less)?;
                let elem = self.parse_type_ref()?;
                self.expect(TokenKind::Greater)?;
                Type::Vector(elem)
            }
            TokenKind::Map => {
                self.advance();
                self.expect(TokenKind::Less)?;
                let (key, value) = self.parse_key_value_types()?;
                self.expect(TokenKind::Greater)?;
                Type::Map(key, value)
            }
            TokenKind::Eof | TokenKind::Unknown => return Err(self.unexpected("type")),
            _ => return Err(ParseError::expected_type(token.span, &token.describe())),
        };
        Ok(ty)
    }

    /// Parse a type and move it into the arena.
    pub(crate) fn parse_type_ref(&mut self) -> Result<&'ast Type<'ast>, ParseError> {
        let ty = self.parse_type()?;
        Ok(self.arena.alloc(ty))
    }

    /// Parse `KEY ',' VALUE`, the inside of a map's angle brackets.
    pub(crate) fn parse_key_value_types(
        &mut self,
    ) -> Result<(&'ast Type<'ast>, &'ast Type<'ast>), ParseError> {
        let key = self.parse_type_ref()?;
        self.expect(TokenKind::Comma)?;
        let value = self.parse_type_ref()?;
        Ok((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glacier_core::ParseErrorKind;

    fn parse(source: &str) -> Result<String, ParseError> {
        let arena = bumpalo::Bump::new();
        let mut parser = Parser::new(source, &arena).unwrap();
        parser.parse_type().map(|ty| ty.to_string())
    }

    #[test]
    fn primitive_types() {
        assert_eq!(parse("int").unwrap(), "int");
        assert_eq!(parse("string").unwrap(), "string");
        assert_eq!(parse("void").unwrap(), "void");
    }

    #[test]
    fn user_type() {
        assert_eq!(parse("Foo").unwrap(), "Foo");
    }

    #[test]
    fn nested_containers() {
        assert_eq!(
            parse("map<string, vector<Foo>>").unwrap(),
            "map<string, vector<Foo>>"
        );
    }

    #[test]
    fn missing_angle_bracket() {
        let err = parse("vector int").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
    }

    #[test]
    fn not_a_type() {
        let err = parse("42").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedType);
    }
}
