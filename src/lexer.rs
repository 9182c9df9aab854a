use std::fmt;

use thiserror::Error;

use crate::ast::Token;

/// Location in the source text.
///
/// `offset` counts characters from the start of the input; `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while splitting the source into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    #[error("invalid escape sequence '\\{sequence}' at {position}")]
    InvalidEscape {
        sequence: String,
        position: Position,
    },

    #[error("control character in string at {position}")]
    ControlCharacter { position: Position },

    #[error("invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidEscape { position, .. }
            | LexError::ControlCharacter { position }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }
}

/// Returns `true` for words the lexer never emits as identifiers.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "and" | "AND" | "or" | "OR" | "not" | "NOT" | "true" | "false"
    )
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            token_start: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
        }
    }

    /// Position where the most recently returned token starts.
    pub fn token_position(&self) -> Position {
        self.token_start
    }

    /// Position of the cursor.
    fn cursor(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        match self.current_char() {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => return,
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\r' | '\n') {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_segment(&mut self, result: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Reads a dotted identifier; the caller guarantees a valid first char.
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        self.read_segment(&mut result);

        while self.current_char() == Some('.')
            && self
                .peek_char(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            result.push('.');
            self.advance();
            self.read_segment(&mut result);
        }
        result
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.cursor();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_start = self.cursor();
                    self.advance(); // Consume backslash
                    let escaped = match self.current_char() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.read_unicode_escape(escape_start)?,
                        Some(other) => {
                            return Err(LexError::InvalidEscape {
                                sequence: other.to_string(),
                                position: escape_start,
                            });
                        }
                        None => {
                            return Err(LexError::UnterminatedString { position: start });
                        }
                    };
                    result.push(escaped);
                    self.advance();
                }
                c if (c as u32) < 0x20 => {
                    return Err(LexError::ControlCharacter {
                        position: self.cursor(),
                    });
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    /// Reads `uXXXX` with the cursor on `u`, leaving it on the last hex digit.
    fn read_unicode_escape(&mut self, escape_start: Position) -> Result<char, LexError> {
        let digits: String = (1..=4).filter_map(|i| self.peek_char(i)).collect();

        let invalid = || LexError::InvalidEscape {
            sequence: format!("u{}", digits),
            position: escape_start,
        };

        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let code = u32::from_str_radix(&digits, 16).map_err(|_| invalid())?;
        let ch = char::from_u32(code).ok_or_else(invalid)?;

        for _ in 0..4 {
            self.advance();
        }
        Ok(ch)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.cursor();
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        let digits_start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let invalid = |text: String| LexError::InvalidNumber {
            text,
            position: start,
        };

        let integer_part: String = self.input[digits_start..self.position]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if integer_part.is_empty() || (integer_part.len() > 1 && integer_part.starts_with('0')) {
            return Err(invalid(number));
        }

        // A letter glued to the digits ("12ab") is not a number.
        if self
            .current_char()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            number.push(self.current_char().unwrap_or_default());
            return Err(invalid(number));
        }

        if !is_float && let Ok(n) = number.parse::<i64>() {
            return Ok(Token::Integer(n));
        }

        // Out of i64 range integers are still numbers, kept as floats, as
        // long as they stay finite.
        match number.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Float(n)),
            _ => Err(invalid(number)),
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn pair(&mut self, token: Token) -> Token {
        self.advance();
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.cursor();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some(',') => self.single(Token::Comma),
            Some('?') => self.single(Token::Question),
            Some('~') => self.single(Token::Tilde),
            Some(':') => self.single(Token::Colon),
            Some('=') => self.single(Token::Eq),
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.pair(Token::GtEq)
                } else {
                    self.single(Token::Gt)
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.pair(Token::LtEq)
                } else {
                    self.single(Token::Lt)
                }
            }
            Some('!') => match self.peek_char(1) {
                Some('=') => self.pair(Token::NotEq),
                Some(':') => self.pair(Token::NotColon),
                _ => {
                    return Err(LexError::UnexpectedChar {
                        ch: '!',
                        position: self.cursor(),
                    });
                }
            },
            Some('"') => Token::String(self.read_string()?),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "and" | "AND" => Token::And,
                    "or" | "OR" => Token::Or,
                    "not" | "NOT" => Token::Not,
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) => {
                return Err(LexError::UnexpectedChar {
                    ch,
                    position: self.cursor(),
                });
            }
        };

        Ok(token)
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR not true false And");
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Identifier("And".to_string())
    );
}

#[test]
fn test_field_expression() {
    let mut lexer = Lexer::new("req.fields.ext!:[\"jpg\", 2]");
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Identifier("req.fields.ext".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::NotColon);
    assert_eq!(lexer.next_token().unwrap(), Token::LBracket);
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::String("jpg".to_string())
    );
    assert_eq!(lexer.next_token().unwrap(), Token::Comma);
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(2));
    assert_eq!(lexer.next_token().unwrap(), Token::RBracket);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_token_position_tracks_lines() {
    let mut lexer = Lexer::new("a:1\n  and b");
    for _ in 0..3 {
        lexer.next_token().unwrap();
    }
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(
        lexer.token_position(),
        Position {
            offset: 6,
            line: 2,
            column: 3
        }
    );
}

#[test]
fn test_huge_integer_becomes_float() {
    let mut lexer = Lexer::new("99999999999999999999");
    assert_eq!(lexer.next_token().unwrap(), Token::Float(1e20));
}

#[test]
fn test_non_finite_number_is_rejected() {
    let huge = format!("1{}", "0".repeat(400));
    for input in [huge.clone(), format!("-{}", huge), format!("{}.5", huge)] {
        let mut lexer = Lexer::new(&input);
        assert!(
            matches!(
                lexer.next_token(),
                Err(LexError::InvalidNumber { position, .. }) if position.offset == 0
            ),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_error_position_after_multiline_string() {
    let mut lexer = Lexer::new("a:\"x\ny\\u00e9\" and\n  b:\"\\q\"");
    for _ in 0..6 {
        lexer.next_token().unwrap();
    }
    assert_eq!(
        lexer.next_token(),
        Err(LexError::InvalidEscape {
            sequence: "q".to_string(),
            position: Position {
                offset: 23,
                line: 3,
                column: 6
            }
        })
    );
}
