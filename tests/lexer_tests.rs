// tests/lexer_tests.rs

use siftql::ast::Token;
use siftql::lexer::{LexError, Lexer, Position};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            return out;
        }
        out.push(token);
    }
}

fn lex_error(input: &str) -> LexError {
    let mut lexer = Lexer::new(input);
    loop {
        match lexer.next_token() {
            Ok(Token::Eof) => panic!("expected an error for {:?}", input),
            Ok(_) => {}
            Err(e) => return e,
        }
    }
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        (",", Token::Comma),
        (":", Token::Colon),
        ("=", Token::Eq),
        (">", Token::Gt),
        ("<", Token::Lt),
        ("~", Token::Tilde),
        ("?", Token::Question),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

// ============================================================================
// Two Character Tokens
// ============================================================================

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("!=", Token::NotEq),
        ("!:", Token::NotColon),
        (">=", Token::GtEq),
        ("<=", Token::LtEq),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_lone_bang_is_an_error() {
    assert!(matches!(
        lex_error("a ! b"),
        LexError::UnexpectedChar { ch: '!', .. }
    ));
}

// ============================================================================
// Keywords and Identifiers
// ============================================================================

#[test]
fn test_keywords_both_cases() {
    assert_eq!(
        tokens("and AND or OR not NOT true false"),
        vec![
            Token::And,
            Token::And,
            Token::Or,
            Token::Or,
            Token::Not,
            Token::Not,
            Token::Boolean(true),
            Token::Boolean(false),
        ]
    );
}

#[test]
fn test_mixed_case_keywords_are_identifiers() {
    assert_eq!(
        tokens("Or TRUE"),
        vec![
            Token::Identifier("Or".to_string()),
            Token::Identifier("TRUE".to_string()),
        ]
    );
}

#[test]
fn test_dotted_identifiers() {
    assert_eq!(
        tokens("address.city _private.x_1"),
        vec![
            Token::Identifier("address.city".to_string()),
            Token::Identifier("_private.x_1".to_string()),
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(
        tokens("android order"),
        vec![
            Token::Identifier("android".to_string()),
            Token::Identifier("order".to_string()),
        ]
    );
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("0 42 -7 3.25 -0.5"),
        vec![
            Token::Integer(0),
            Token::Integer(42),
            Token::Integer(-7),
            Token::Float(3.25),
            Token::Float(-0.5),
        ]
    );
}

#[test]
fn test_huge_integer_becomes_float() {
    assert_eq!(
        tokens("99999999999999999999"),
        vec![Token::Float(99999999999999999999.0)]
    );
}

#[test]
fn test_invalid_numbers() {
    for input in ["007", "12ab", "-01"] {
        assert!(
            matches!(lex_error(input), LexError::InvalidNumber { .. }),
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_escapes() {
    assert_eq!(
        tokens(r#""a\"b\\c\/d\n\té""#),
        vec![Token::String("a\"b\\c/d\n\té".to_string())]
    );
}

#[test]
fn test_unicode_passthrough() {
    assert_eq!(
        tokens("\"héllo wörld\""),
        vec![Token::String("héllo wörld".to_string())]
    );
}

#[test]
fn test_unterminated_string() {
    let err = lex_error("name:\"abc");
    assert_eq!(
        err,
        LexError::UnterminatedString {
            position: Position {
                offset: 5,
                line: 1,
                column: 6
            }
        }
    );
}

#[test]
fn test_invalid_escape() {
    assert!(matches!(
        lex_error(r#""\q""#),
        LexError::InvalidEscape { .. }
    ));
    assert!(matches!(
        lex_error(r#""\u12""#),
        LexError::InvalidEscape { .. }
    ));
}

#[test]
fn test_raw_control_character_rejected() {
    assert!(matches!(
        lex_error("\"a\nb\""),
        LexError::ControlCharacter { .. }
    ));
}

// ============================================================================
// Full Expressions
// ============================================================================

#[test]
fn test_whitespace_is_insignificant() {
    assert_eq!(tokens("a:1\tand\r\nb?"), tokens("a : 1 and b ?"));
}

#[test]
fn test_full_query() {
    assert_eq!(
        tokens(r#"status:pending and (title~"hello" or not email?)"#),
        vec![
            Token::Identifier("status".to_string()),
            Token::Colon,
            Token::Identifier("pending".to_string()),
            Token::And,
            Token::LParen,
            Token::Identifier("title".to_string()),
            Token::Tilde,
            Token::String("hello".to_string()),
            Token::Or,
            Token::Not,
            Token::Identifier("email".to_string()),
            Token::Question,
            Token::RParen,
        ]
    );
}
