use tracing::debug;

use super::{Result, check_multi_value, range};
use crate::{
    ast::{EpQlTerm, ResolvedTerm},
    lucene::{SearchQuery, analyze},
};

/// Compiles one resolved term into a search primitive: a range for ordering
///  operators, otherwise an exact match per value. The sign of `<>` is not
///  encoded here, it becomes the clause occurrence.
pub fn build(resolved: &ResolvedTerm, term: &EpQlTerm, date_format: &str) -> Result<Option<SearchQuery>> {
    check_multi_value(resolved)?;

    // Legality depends on operator and type only, so it is checked before
    //  anything can be skipped.
    if range::is_range_query(term.operator) {
        let query = range::build(resolved, term.operator, date_format)?;
        return Ok(Some(SearchQuery::Range(query)));
    }

    let mut matches = Vec::with_capacity(resolved.values.len());
    for value in &resolved.values {
        if let Some(query) = exact_match(resolved, value, date_format)? {
            matches.push(query);
        }
    }
    match matches.len() {
        0 => {
            debug!(field = %resolved.field, "term resolved to no values, skipping");
            Ok(None)
        }
        1 => Ok(matches.pop()),
        _ => Ok(Some(SearchQuery::any_of(matches))),
    }
}

/// Analyzed text matches its tokens in order, numbers and dates match in
///  their indexed form, anything else verbatim. `None` when analysis leaves
///  nothing.
fn exact_match(resolved: &ResolvedTerm, value: &str, date_format: &str) -> Result<Option<SearchQuery>> {
    let field_type = resolved.field_type();
    let terms = if resolved.descriptor.analyzed {
        analyze(value)
    } else if field_type.is_ordered() {
        vec![range::bound_value(&resolved.field, field_type, value, date_format)?]
    } else {
        vec![value.to_string()]
    };
    if terms.is_empty() {
        Ok(None)
    } else {
        Ok(Some(SearchQuery::phrase(resolved.field.clone(), terms)))
    }
}
