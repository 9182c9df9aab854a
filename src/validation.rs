use crate::{
    ast::{Expr, FieldExpr, FieldOperator, Valuer},
    schema::{Schema, ValidationError, ValidationErrors},
};

impl Expr {
    /// Checks this query against `schema`, pruning what the schema rejects.
    ///
    /// Returns the remaining tree (`None` if nothing survives) together with
    /// every error found. Validation never short-circuits:
    ///
    /// - a field missing from the schema is an error and its node is dropped;
    /// - a literal failing its rule drops the node;
    /// - a one-of list keeps the members that pass, even if none do;
    /// - `and` / `or` with one side dropped collapse to the other side;
    /// - `not` keeps wrapping whatever is left of its operand.
    ///
    /// `field?` nodes are only checked for the field being in the schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use siftql::{parse, schema::{Schema, rules}};
    ///
    /// let schema = Schema::new().field("status", rules::equals_one_of(["pending", "done"]));
    /// let (pruned, errors) = parse("status:pending and age:200").unwrap().validate(&schema);
    ///
    /// assert_eq!(pruned, Some(parse("status:pending").unwrap()));
    /// assert_eq!(errors.len(), 1);
    /// assert!(errors.to_string().contains("age"));
    /// ```
    pub fn validate(&self, schema: &Schema) -> (Option<Expr>, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let expr = self.validate_into(schema, &mut errors);
        (expr, errors)
    }

    fn validate_into(&self, schema: &Schema, errors: &mut ValidationErrors) -> Option<Expr> {
        match self {
            Expr::Binary { left, op, right } => {
                let left = left.validate_into(schema, errors);
                let right = right.validate_into(schema, errors);
                match (left, right) {
                    (Some(left), Some(right)) => Some(Expr::binary(left, *op, right)),
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (None, None) => None,
                }
            }
            Expr::Not(inner) => inner.validate_into(schema, errors).map(Expr::negate),
            Expr::Field(field) => field.validate_into(schema, errors).map(Expr::Field),
        }
    }
}

impl FieldExpr {
    fn validate_into(&self, schema: &Schema, errors: &mut ValidationErrors) -> Option<FieldExpr> {
        let Some(rule) = schema.get(&self.field) else {
            errors.push(ValidationError::UnknownField {
                field: self.field.clone(),
            });
            return None;
        };

        if self.op == FieldOperator::Exists {
            return Some(self.clone());
        }

        match &self.value {
            Valuer::OneOf(values) => {
                let kept = values
                    .iter()
                    .filter(|member| match rule(self.field.as_str(), &member.value()) {
                        Ok(()) => true,
                        Err(e) => {
                            errors.push(e);
                            false
                        }
                    })
                    .cloned()
                    .collect();
                Some(FieldExpr::new(
                    self.field.clone(),
                    self.op,
                    Valuer::OneOf(kept),
                ))
            }
            value => match rule(self.field.as_str(), &value.value()) {
                Ok(()) => Some(self.clone()),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
        }
    }
}
