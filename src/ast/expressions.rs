use crate::{
    ast::{BooleanOperator, FieldOperator},
    value::Scalar,
};

/// Node of a parsed query.
///
/// Trees are built once by the parser (or by hand) and never mutated;
/// every backend walks them by reference, recursively. Parsed trees are at
/// most [`MAX_DEPTH`](crate::parser::MAX_DEPTH) deep; hand-built trees
/// should be checked with [`Expr::depth`] before being handed to a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Two sub-expressions joined by `and` / `or`
    ///
    /// # Example
    /// ```text
    /// status:200 and eps < 0.003
    /// ```
    Binary {
        left: Box<Expr>,
        op: BooleanOperator,
        right: Box<Expr>,
    },

    /// Negated sub-expression
    ///
    /// # Example
    /// ```text
    /// not (status:200)
    /// ```
    Not(Box<Expr>),

    /// Field compared against a literal
    ///
    /// # Example
    /// ```text
    /// req.fields.ext:["jpg", "png"]
    /// ```
    Field(FieldExpr),
}

impl Expr {
    /// Builds a binary node.
    pub fn binary(left: Expr, op: BooleanOperator, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Builds `left and right`.
    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::binary(left, BooleanOperator::And, right)
    }

    /// Builds `left or right`.
    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::binary(left, BooleanOperator::Or, right)
    }

    /// Builds `not inner`.
    pub fn negate(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    /// Builds a field node.
    pub fn field(field: impl Into<String>, op: FieldOperator, value: Valuer) -> Self {
        Expr::Field(FieldExpr::new(field, op, value))
    }

    /// Number of nodes on the longest root-to-leaf path.
    ///
    /// Walks the tree with an explicit stack, so it is safe on trees of any
    /// depth.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match expr {
                Expr::Binary { left, right, .. } => {
                    stack.push((left.as_ref(), depth + 1));
                    stack.push((right.as_ref(), depth + 1));
                }
                Expr::Not(inner) => stack.push((inner.as_ref(), depth + 1)),
                Expr::Field(_) => {}
            }
        }
        deepest
    }

    /// Field paths referenced by this tree, left to right, duplicates kept.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Binary { left, right, .. } => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
            Expr::Not(inner) => inner.collect_fields(out),
            Expr::Field(field) => out.push(&field.field),
        }
    }
}

/// A field path, an operator, and the literal to test against.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpr {
    /// Dotted path, e.g. `address.city`
    pub field: String,
    pub op: FieldOperator,
    pub value: Valuer,
}

impl FieldExpr {
    pub fn new(field: impl Into<String>, op: FieldOperator, value: Valuer) -> Self {
        FieldExpr {
            field: field.into(),
            op,
            value,
        }
    }
}

/// Literal (or literal list) on the right-hand side of a field expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Valuer {
    /// Quoted string
    String(String),

    /// Number; the parser produces this for every numeric literal
    Number(f64),

    /// Integer, only found in hand-built trees
    ///
    /// Compared as `f64` like every other number.
    Integer(i64),

    /// `true` / `false`
    Bool(bool),

    /// Bare word used as a value, compared as a string
    ///
    /// # Example
    /// ```text
    /// status:pending
    /// ```
    Identifier(String),

    /// Bracketed list; matches if any member matches
    ///
    /// # Example
    /// ```text
    /// occupation:[designer, "ux analyst"]
    /// ```
    OneOf(Vec<Valuer>),
}

impl Valuer {
    /// Plain scalar carried by this literal.
    ///
    /// Identifiers yield strings and one-of lists yield [`Scalar::List`].
    pub fn value(&self) -> Scalar {
        match self {
            Valuer::String(s) | Valuer::Identifier(s) => Scalar::String(s.clone()),
            Valuer::Number(n) => Scalar::Float(*n),
            Valuer::Integer(n) => Scalar::Integer(*n),
            Valuer::Bool(b) => Scalar::Bool(*b),
            Valuer::OneOf(values) => Scalar::List(values.iter().map(Valuer::value).collect()),
        }
    }

    pub fn is_one_of(&self) -> bool {
        matches!(self, Valuer::OneOf(_))
    }
}

impl From<&str> for Valuer {
    fn from(s: &str) -> Self {
        Valuer::String(s.to_string())
    }
}

impl From<String> for Valuer {
    fn from(s: String) -> Self {
        Valuer::String(s)
    }
}

impl From<f64> for Valuer {
    fn from(n: f64) -> Self {
        Valuer::Number(n)
    }
}

impl From<i64> for Valuer {
    fn from(n: i64) -> Self {
        Valuer::Integer(n)
    }
}

impl From<bool> for Valuer {
    fn from(b: bool) -> Self {
        Valuer::Bool(b)
    }
}

impl<T: Into<Valuer>> From<Vec<T>> for Valuer {
    fn from(values: Vec<T>) -> Self {
        Valuer::OneOf(values.into_iter().map(Into::into).collect())
    }
}
