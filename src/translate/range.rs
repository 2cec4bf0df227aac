use super::{Error, Result, numeric_literal, parse_date, parse_date_time, single_value};
use crate::{
    ast::{FieldType, Operator, ResolvedTerm},
    lucene::RangeQuery,
};

/// Only the ordering operators turn into ranges, `=` and `<>` are always
///  exact matches.
pub fn is_range_query(operator: Operator) -> bool {
    operator.is_ordering()
}

/// Builds a one-sided range for `field <op> value`. `<`/`<=` bound from
///  above, `>`/`>=` from below; the bound is inclusive for the "or-equal"
///  variants.
pub fn build(resolved: &ResolvedTerm, operator: Operator, date_format: &str) -> Result<RangeQuery> {
    let field_type = resolved.field_type();
    let unsupported = || Error::UnsupportedRangeQuery {
        field: resolved.field.clone(),
        field_type,
        operator,
    };
    let upper_bounded = match operator {
        Operator::Less | Operator::LessOrEqual => true,
        Operator::More | Operator::MoreOrEqual => false,
        Operator::Equal | Operator::NotEqual => return Err(unsupported()),
    };
    if !field_type.is_ordered() {
        return Err(unsupported());
    }

    let value = single_value(resolved)?;
    let bound = Some(bound_value(&resolved.field, field_type, value, date_format)?);
    let (lower, upper) = if upper_bounded {
        (None, bound)
    } else {
        (bound, None)
    };

    Ok(RangeQuery {
        field: resolved.field.clone(),
        lower,
        upper,
        inclusive: operator.is_inclusive(),
    })
}

/// A value in the form the index stores it: validated numbers verbatim,
///  dates in `date_format`.
pub(crate) fn bound_value(field: &str, field_type: FieldType, value: &str, date_format: &str) -> Result<String> {
    match field_type {
        FieldType::Date => {
            let date = parse_date(field, value)?;
            date.and_hms_opt(0, 0, 0)
                .map(|dt| dt.format(date_format).to_string())
                .ok_or_else(|| Error::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "date out of range".into(),
                })
        }
        FieldType::DateTime => Ok(parse_date_time(field, value)?
            .format(date_format)
            .to_string()),
        _ => Ok(numeric_literal(field, field_type, value)?.to_string()),
    }
}
