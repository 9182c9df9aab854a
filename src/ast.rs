//! # siftql - Abstract Syntax Tree
//!
//! This module defines the syntax tree produced by the parser and consumed by
//! every backend (matching, SQL compilation, schema validation, rendering).
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - `Expr`, `FieldExpr` and the `Valuer` literals
//! - **[operators]** - Boolean and field operators
//! - **display** - Canonical, re-parseable text rendering
//!
//! ## Quick Start
//!
//! ```text
//! status:pending and period_months < 4 and (title:"hello world" or name:"John Doe")
//! ```
//!
//! ## Core Concepts
//!
//! ### Field Expressions
//!
//! A field path, an operator and a literal:
//!
//! ```text
//! <field> <operator> <value>
//! ```
//!
//! | Operator             | Meaning        |
//! |----------------------|----------------|
//! | `:` or `=`           | Equal, one of  |
//! | `!=` or `!:`         | Not equal      |
//! | `>`, `>=`, `<`, `<=` | Comparison     |
//! | `~`                  | Substring      |
//! | `field?`             | Field is set   |
//!
//! A bare field name is shorthand for `field = true`.
//!
//! ### One-of Lists
//!
//! ```text
//! occupation: [designer, "ux analyst"]
//! ```
//!
//! matches when any member matches.
//!
//! ### Numbers
//!
//! Every numeric literal is compared as a 64-bit float, whether or not it
//! was written with a fractional part.
mod display;
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, FieldExpr, Valuer};
pub use operators::{BooleanOperator, FieldOperator};
pub use tokens::Token;
