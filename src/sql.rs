use thiserror::Error;

use crate::{
    ast::{Expr, FieldExpr, FieldOperator, Valuer},
    value::Scalar,
};

/// Query trees that have no SQL equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    #[error("operator '{op}' cannot be applied to a one-of list (field '{field}')")]
    UnsupportedOneOf { field: String, op: FieldOperator },

    #[error("one-of list for field '{field}' contains another one-of list")]
    NestedOneOf { field: String },
}

impl Expr {
    /// Compiles this query into a SQL condition with `?` placeholders.
    ///
    /// Arguments are returned in placeholder order. Field paths are emitted
    /// as-is, so they must be trusted column names (e.g. after
    /// [`validate`](Expr::validate) against a schema).
    ///
    /// # Examples
    ///
    /// ```
    /// use siftql::{Scalar, parse};
    ///
    /// let (sql, args) = parse(r#"age>=18 and city="Ba""#).unwrap().to_sql().unwrap();
    /// assert_eq!(sql, "(age >= ? AND city = ?)");
    /// assert_eq!(args, vec![Scalar::Float(18.0), Scalar::String("Ba".into())]);
    /// ```
    pub fn to_sql(&self) -> Result<(String, Vec<Scalar>), SqlError> {
        let mut sql = String::new();
        let mut args = Vec::new();
        self.write_sql(&mut sql, &mut args)?;
        Ok((sql, args))
    }

    fn write_sql(&self, sql: &mut String, args: &mut Vec<Scalar>) -> Result<(), SqlError> {
        match self {
            Expr::Binary { left, op, right } => {
                sql.push('(');
                left.write_sql(sql, args)?;
                sql.push(' ');
                sql.push_str(op.sql_keyword());
                sql.push(' ');
                right.write_sql(sql, args)?;
                sql.push(')');
            }
            Expr::Not(inner) => {
                sql.push_str("NOT ");
                inner.write_sql(sql, args)?;
            }
            Expr::Field(field) => field.write_sql(sql, args)?,
        }
        Ok(())
    }
}

impl FieldExpr {
    fn write_sql(&self, sql: &mut String, args: &mut Vec<Scalar>) -> Result<(), SqlError> {
        if self.op == FieldOperator::Exists {
            sql.push_str(&self.field);
            sql.push_str(" IS NOT NULL");
            return Ok(());
        }

        if let Valuer::OneOf(values) = &self.value {
            return self.write_one_of(values, sql, args);
        }

        // Every operator except Exists has an SQL spelling.
        let op = self.op.sql_operator().unwrap_or("=");
        sql.push_str(&self.field);
        sql.push(' ');
        sql.push_str(op);
        sql.push_str(" ?");
        args.push(self.value.value());
        Ok(())
    }

    fn write_one_of(
        &self,
        values: &[Valuer],
        sql: &mut String,
        args: &mut Vec<Scalar>,
    ) -> Result<(), SqlError> {
        let (keyword, empty) = match self.op {
            FieldOperator::Equal => ("IN", "(1=0)"),
            FieldOperator::NotEqual => ("NOT IN", "(1=1)"),
            op => {
                return Err(SqlError::UnsupportedOneOf {
                    field: self.field.clone(),
                    op,
                });
            }
        };

        if values.iter().any(Valuer::is_one_of) {
            return Err(SqlError::NestedOneOf {
                field: self.field.clone(),
            });
        }

        if values.is_empty() {
            sql.push_str(empty);
            return Ok(());
        }

        let placeholders = vec!["?"; values.len()].join(",");
        sql.push_str(&format!("{} {} ({})", self.field, keyword, placeholders));
        args.extend(values.iter().map(Valuer::value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn not_prefixes_inner_fragment() {
        let (sql, args) = parse("not (a:1 or b:2)").unwrap().to_sql().unwrap();
        assert_eq!(sql, "NOT (a = ? OR b = ?)");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn empty_one_of_is_constant() {
        let (sql, args) = parse("a:[]").unwrap().to_sql().unwrap();
        assert_eq!(sql, "(1=0)");
        assert!(args.is_empty());

        let (sql, _) = parse("a!=[]").unwrap().to_sql().unwrap();
        assert_eq!(sql, "(1=1)");
    }

    #[test]
    fn nested_one_of_is_rejected() {
        let expr = Expr::field(
            "a",
            FieldOperator::Equal,
            Valuer::OneOf(vec![Valuer::from(vec![1.0])]),
        );
        assert_eq!(
            expr.to_sql(),
            Err(SqlError::NestedOneOf { field: "a".into() })
        );
    }
}
