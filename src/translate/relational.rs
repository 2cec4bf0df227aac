use chrono::{NaiveDate, NaiveDateTime};

use super::{
    Error, Result, check_multi_value, numeric_literal, parse_bool, parse_date, parse_date_time,
    single_value,
};
use crate::ast::{Conjunction, EpQlTerm, FieldType, Operator, ResolvedTerm};

/// A typed literal on the right-hand side of a JPQL/SQL comparison. How it
///  is spelled depends on the dialect, see `to_sql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    String(String),
    /// Already validated, kept exactly as written.
    Number(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationalQuery {
    Comparison {
        field: String,
        operator: Operator,
        literal: Literal,
    },
    /// `field IN (...)` / `field NOT IN (...)` for multi-valued fields.
    InList {
        field: String,
        negated: bool,
        literals: Vec<Literal>,
    },
    /// A parenthesized sub-expression.
    Group(Vec<RelationalClause>),
}

/// A predicate and the conjunction that joins it to the one before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalClause {
    pub query: RelationalQuery,
    pub conjunction: Conjunction,
}

/// Compiles one resolved term into `field <op> literal`.
pub fn build(resolved: &ResolvedTerm, term: &EpQlTerm) -> Result<RelationalQuery> {
    check_multi_value(resolved)?;
    let operator = term.operator;

    if resolved.values.len() > 1 {
        let negated = match operator {
            Operator::Equal => false,
            Operator::NotEqual => true,
            _ => {
                return Err(Error::MultiValueNotAllowed {
                    field: resolved.field.clone(),
                    count: resolved.values.len(),
                });
            }
        };
        let literals = resolved
            .values
            .iter()
            .map(|v| literal(&resolved.field, resolved.field_type(), v))
            .collect::<Result<Vec<_>>>()?;
        return Ok(RelationalQuery::InList {
            field: resolved.field.clone(),
            negated,
            literals,
        });
    }

    let value = single_value(resolved)?;
    Ok(RelationalQuery::Comparison {
        field: resolved.field.clone(),
        operator,
        literal: literal(&resolved.field, resolved.field_type(), value)?,
    })
}

fn literal(field: &str, field_type: FieldType, value: &str) -> Result<Literal> {
    Ok(match field_type {
        FieldType::String | FieldType::Text | FieldType::Enum => Literal::String(value.to_string()),
        FieldType::Integer | FieldType::Float | FieldType::Decimal => {
            Literal::Number(numeric_literal(field, field_type, value)?.to_string())
        }
        FieldType::Boolean => Literal::Boolean(parse_bool(field, value)?),
        FieldType::Date => Literal::Date(parse_date(field, value)?),
        FieldType::DateTime => Literal::DateTime(parse_date_time(field, value)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FieldDescriptor;

    fn resolved(name: &str, ty: FieldType, values: &[&str]) -> ResolvedTerm {
        ResolvedTerm::new(
            FieldDescriptor::new(name, ty),
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    #[test]
    fn test_comparison() {
        let term = EpQlTerm::new("Price", Operator::More, "10.00");
        let q = build(&resolved("price", FieldType::Decimal, &["10.00"]), &term).unwrap();
        assert_eq!(
            q,
            RelationalQuery::Comparison {
                field: "price".into(),
                operator: Operator::More,
                literal: Literal::Number("10.00".into()),
            }
        );
    }

    #[test]
    fn test_multi_value_rejected() {
        let term = EpQlTerm::new("Code", Operator::Equal, "A");
        let err = build(&resolved("code", FieldType::String, &["A", "B"]), &term).unwrap_err();
        assert_eq!(
            err,
            Error::MultiValueNotAllowed {
                field: "code".into(),
                count: 2
            }
        );
    }

    #[test]
    fn test_multi_valued_field_in_list() {
        let term = EpQlTerm::new("Store", Operator::NotEqual, "A");
        let r = ResolvedTerm::new(
            FieldDescriptor::new("storeCode", FieldType::String).multi_valued(),
            vec!["A".into(), "B".into()],
        );
        match build(&r, &term).unwrap() {
            RelationalQuery::InList {
                negated, literals, ..
            } => {
                assert!(negated);
                assert_eq!(literals.len(), 2);
            }
            other => panic!("Expected InList, got {:?}", other),
        }

        let ordering = EpQlTerm::new("Store", Operator::Less, "A");
        assert!(matches!(
            build(&r, &ordering),
            Err(Error::MultiValueNotAllowed { .. })
        ));
    }

    #[test]
    fn test_typed_literals() {
        let term = EpQlTerm::new("Enabled", Operator::Equal, "true");
        let q = build(&resolved("enabled", FieldType::Boolean, &["TRUE"]), &term).unwrap();
        assert!(matches!(
            q,
            RelationalQuery::Comparison {
                literal: Literal::Boolean(true),
                ..
            }
        ));

        let term = EpQlTerm::new("Qty", Operator::Equal, "abc");
        assert!(matches!(
            build(&resolved("qty", FieldType::Integer, &["abc"]), &term),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_value() {
        let term = EpQlTerm::new("Code", Operator::Equal, "");
        assert_eq!(
            build(&resolved("code", FieldType::String, &[]), &term),
            Err(Error::MissingValue("code".into()))
        );
    }
}
