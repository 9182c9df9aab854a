//! Canonical text rendering.
//!
//! The output is valid query syntax: parsing it again yields a tree that
//! matches and compiles to SQL exactly like the original. Boolean nodes are
//! always parenthesized, so precedence never depends on the reader.

use std::fmt::{self, Write};

use crate::{
    ast::{Expr, FieldExpr, FieldOperator, Valuer},
    lexer::is_keyword,
};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Not(inner) => match inner.as_ref() {
                Expr::Binary { .. } => write!(f, "not {}", inner),
                _ => write!(f, "not ({})", inner),
            },
            Expr::Field(field) => write!(f, "{}", field),
        }
    }
}

impl fmt::Display for FieldExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            FieldOperator::Exists => write!(f, "{}?", self.field),
            op => write!(f, "{} {} {}", self.field, op, self.value),
        }
    }
}

impl fmt::Display for Valuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valuer::String(s) => write_quoted(f, s),
            Valuer::Identifier(name) if is_bare_word(name) => f.write_str(name),
            Valuer::Identifier(name) => write_quoted(f, name),
            Valuer::Number(n) => write!(f, "{}", n),
            Valuer::Integer(n) => write!(f, "{}", n),
            Valuer::Bool(b) => write!(f, "{}", b),
            Valuer::OneOf(values) => {
                f.write_char('[')?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_char(']')
            }
        }
    }
}

/// Whether `name` would lex back as a single identifier token.
fn is_bare_word(name: &str) -> bool {
    !is_keyword(name)
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0c}' => f.write_str("\\f")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
