use thiserror::Error;

use crate::{
    ast::{BooleanOperator, Expr, FieldOperator, Token, Valuer},
    lexer::{LexError, Lexer, Position},
};

/// Deepest tree the parser builds, counting every node on the longest path.
///
/// Matching, validation, SQL compilation and rendering all recurse over the
/// tree, so their stack use is bounded by this for parsed queries. A flat
/// chain like `a and b and c` is left-deep: each extra term adds a level.
pub const MAX_DEPTH: usize = 256;

/// Errors raised while parsing a query. No partial tree is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {position}")]
    Unexpected {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("query nested deeper than {max} levels at {position}", max = MAX_DEPTH)]
    TooDeep { position: Position },
}

impl ParseError {
    /// Where in the source the error was detected.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Unexpected { position, .. } | ParseError::TooDeep { position } => *position,
        }
    }
}

/// Recursive-descent parser over the token stream.
///
/// Precedence, lowest first: `or`, `and`, `not`, then parenthesized groups
/// and field expressions.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
    nesting: usize,
}

/// A parsed subtree and its height.
type Parsed = (Expr, usize);

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_position();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_position();
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(&self.current_token) == std::mem::discriminant(token)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: self.current_token.describe(),
            position: self.current_position,
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&expected.describe()));
        }
        self.advance()
    }

    fn too_deep(&self) -> ParseError {
        ParseError::TooDeep {
            position: self.current_position,
        }
    }

    /// Height of a new node over children of `height`.
    fn grow(&self, height: usize) -> Result<usize, ParseError> {
        if height >= MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(height + 1)
    }

    /// Parses the whole input as one expression.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let (expr, _) = self.parse_or()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("'and', 'or' or end of input"));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Parsed, ParseError> {
        let (mut left, mut height) = self.parse_and()?;

        while self.check(&Token::Or) {
            let node_height = self.grow(height)?;
            self.advance()?;
            let (right, right_height) = self.parse_and()?;
            left = Expr::binary(left, BooleanOperator::Or, right);
            height = node_height.max(self.grow(right_height)?);
        }
        Ok((left, height))
    }

    fn parse_and(&mut self) -> Result<Parsed, ParseError> {
        let (mut left, mut height) = self.parse_not()?;

        while self.check(&Token::And) {
            let node_height = self.grow(height)?;
            self.advance()?;
            let (right, right_height) = self.parse_not()?;
            left = Expr::binary(left, BooleanOperator::And, right);
            height = node_height.max(self.grow(right_height)?);
        }
        Ok((left, height))
    }

    fn parse_not(&mut self) -> Result<Parsed, ParseError> {
        if self.check(&Token::Not) {
            self.advance()?;
            let (inner, height) = self.parse_primary()?;
            return Ok((Expr::negate(inner), self.grow(height)?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Parsed, ParseError> {
        if self.check(&Token::LParen) {
            self.enter()?;
            self.advance()?;
            let parsed = self.parse_or()?;
            self.expect(Token::RParen)?;
            self.nesting -= 1;
            return Ok(parsed);
        }
        Ok((self.parse_field()?, 1))
    }

    /// Opens a `(` level, bounding recursion before any subtree exists to
    /// measure.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.nesting >= MAX_DEPTH {
            return Err(self.too_deep());
        }
        self.nesting += 1;
        Ok(())
    }

    fn parse_field(&mut self) -> Result<Expr, ParseError> {
        let field = match &self.current_token {
            Token::Identifier(name) => name.clone(),
            _ => return Err(self.unexpected("field name or '('")),
        };
        self.advance()?;

        if self.check(&Token::Question) {
            self.advance()?;
            return Ok(Expr::field(
                field,
                FieldOperator::Exists,
                Valuer::Bool(true),
            ));
        }

        let op = match self.field_operator() {
            Some(op) => op,
            // Bare field name: boolean shorthand for `field = true`
            None => return Ok(Expr::field(field, FieldOperator::Equal, Valuer::Bool(true))),
        };
        self.advance()?;

        let value = self.parse_value()?;
        Ok(Expr::field(field, op, value))
    }

    fn field_operator(&self) -> Option<FieldOperator> {
        match self.current_token {
            Token::Colon | Token::Eq => Some(FieldOperator::Equal),
            Token::NotEq | Token::NotColon => Some(FieldOperator::NotEqual),
            Token::Gt => Some(FieldOperator::GreaterThan),
            Token::GtEq => Some(FieldOperator::GreaterThanOrEqual),
            Token::Lt => Some(FieldOperator::LessThan),
            Token::LtEq => Some(FieldOperator::LessThanOrEqual),
            Token::Tilde => Some(FieldOperator::Like),
            _ => None,
        }
    }

    fn parse_value(&mut self) -> Result<Valuer, ParseError> {
        if self.check(&Token::LBracket) {
            self.advance()?;
            return self.parse_one_of();
        }
        self.parse_scalar()
    }

    fn parse_one_of(&mut self) -> Result<Valuer, ParseError> {
        let mut values = vec![];

        if !self.check(&Token::RBracket) {
            values.push(self.parse_scalar()?);
            while self.check(&Token::Comma) {
                self.advance()?;
                values.push(self.parse_scalar()?);
            }
        }

        if !self.check(&Token::RBracket) {
            return Err(self.unexpected("',' or ']'"));
        }
        self.advance()?;
        Ok(Valuer::OneOf(values))
    }

    fn parse_scalar(&mut self) -> Result<Valuer, ParseError> {
        let value = match &self.current_token {
            Token::String(s) => Valuer::String(s.clone()),
            // Integers are coerced so every number compares as f64 downstream.
            Token::Integer(n) => Valuer::Number(*n as f64),
            Token::Float(n) => Valuer::Number(*n),
            Token::Boolean(b) => Valuer::Bool(*b),
            Token::Identifier(name) => Valuer::Identifier(name.clone()),
            _ => return Err(self.unexpected("value")),
        };
        self.advance()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Expr, ParseError> {
        Parser::new(Lexer::new(input))?.parse()
    }

    #[test]
    fn not_binds_tighter_than_and() {
        let expr = parse("not a and b").unwrap();
        match expr {
            Expr::Binary {
                left,
                op: BooleanOperator::And,
                ..
            } => assert!(matches!(*left, Expr::Not(_))),
            other => panic!("expected and, got {:?}", other),
        }
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = parse("a:1 b:2").unwrap_err();
        assert_eq!(err.position().offset, 4);
    }

    #[test]
    fn too_deep_reports_position_of_offending_token() {
        let input = format!(
            "{}a{}",
            "(".repeat(MAX_DEPTH + 1),
            ")".repeat(MAX_DEPTH + 1)
        );
        let err = parse(&input).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooDeep {
                position: Position {
                    offset: MAX_DEPTH,
                    line: 1,
                    column: MAX_DEPTH + 1
                }
            }
        );
    }

    #[test]
    fn lex_errors_surface_as_parse_errors() {
        let err = parse("a:\"open").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Lex(LexError::UnterminatedString { .. })
        ));
    }
}
