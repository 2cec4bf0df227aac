use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

use crate::{
    ast::{Conjunction, EpQlTerm, FieldType, Operator, ResolvedTerm},
    config::CompilerConfig,
    lucene::SearchQuery,
};

pub mod range;
pub mod relational;
pub mod search;

pub use relational::{Literal, RelationalClause, RelationalQuery};

/// The three query languages an EPQL expression can be compiled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Dialect {
    Jpql,
    Sql,
    #[default]
    Search,
}

/// The relational subset of [`Dialect`]; only literal rendering differs
///  between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalDialect {
    Jpql,
    Sql,
}

impl Dialect {
    pub fn relational(&self) -> Option<RelationalDialect> {
        match self {
            Dialect::Jpql => Some(RelationalDialect::Jpql),
            Dialect::Sql => Some(RelationalDialect::Sql),
            Dialect::Search => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("field {field} accepts a single value, got {count}")]
    MultiValueNotAllowed { field: String, count: usize },
    #[error("range query on {field} ({field_type:?}) with operator {operator:?} is not supported")]
    UnsupportedRangeQuery {
        field: String,
        field_type: FieldType,
        operator: Operator,
    },
    #[error("{0} is not a known EPQL field")]
    UnknownField(String),
    #[error("could not resolve term: {0}")]
    Resolution(String),
    #[error("invalid value {value:?} for field {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("no value given for field {0}")]
    MissingValue(String),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
    #[error("unknown conjunction code: {0}")]
    UnknownConjunction(u8),
    #[error("conjunction NONE is only valid on the first term")]
    MisplacedConjunction,
    #[error("unbalanced group: {0}")]
    UnbalancedGroup(&'static str),
    #[error("a {found} query cannot be added to a {expected} query")]
    DialectMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One compiled term, tagged with the family of dialect that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeQuery {
    Relational(RelationalQuery),
    Search(SearchQuery),
}

impl NativeQuery {
    pub fn family(&self) -> &'static str {
        match self {
            NativeQuery::Relational(_) => "relational",
            NativeQuery::Search(_) => "search",
        }
    }
}

/// Whether a search clause should match or exclude documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// `<>` is negative, a NOT conjunction flips the result: `NOT a <> 1`
    ///  is a positive match on `a`.
    pub fn of(operator: Operator, conjunction: Conjunction) -> Self {
        let negated_operator = operator == Operator::NotEqual;
        let negated_conjunction = conjunction == Conjunction::Not;
        if negated_operator != negated_conjunction {
            Polarity::Negative
        } else {
            Polarity::Positive
        }
    }
}

/// Operator token used by JPQL and SQL.
pub fn relational_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Equal => "=",
        Operator::NotEqual => "<>",
        Operator::Less => "<",
        Operator::LessOrEqual => "<=",
        Operator::More => ">",
        Operator::MoreOrEqual => ">=",
    }
}

/// Builds the atomic query for a single resolved term. One of these is made
///  per compilation pass, from the pass's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubQueryBuilder {
    Relational,
    Search { date_format: String },
}

impl SubQueryBuilder {
    pub fn new(config: &CompilerConfig) -> Self {
        match config.dialect {
            Dialect::Jpql | Dialect::Sql => SubQueryBuilder::Relational,
            Dialect::Search => SubQueryBuilder::Search {
                date_format: config.search_date_format.clone(),
            },
        }
    }

    /// `Ok(None)` means the term vanished during resolution (e.g. nothing
    ///  but stop words) and should be skipped.
    pub fn build(&self, resolved: &ResolvedTerm, term: &EpQlTerm) -> Result<Option<NativeQuery>> {
        match self {
            SubQueryBuilder::Relational => {
                relational::build(resolved, term).map(|q| Some(NativeQuery::Relational(q)))
            }
            SubQueryBuilder::Search { date_format } => {
                Ok(search::build(resolved, term, date_format)?.map(NativeQuery::Search))
            }
        }
    }
}

/// Fails when several values were resolved for a field that can only be
///  compared against one.
pub(crate) fn check_multi_value(resolved: &ResolvedTerm) -> Result<()> {
    if resolved.values.len() > 1 && !resolved.descriptor.multi_valued {
        return Err(Error::MultiValueNotAllowed {
            field: resolved.field.clone(),
            count: resolved.values.len(),
        });
    }
    Ok(())
}

/// The one and only value of a term, for paths that cannot take more.
pub(crate) fn single_value(resolved: &ResolvedTerm) -> Result<&str> {
    match resolved.values.as_slice() {
        [value] => Ok(value),
        [] => Err(Error::MissingValue(resolved.field.clone())),
        values => Err(Error::MultiValueNotAllowed {
            field: resolved.field.clone(),
            count: values.len(),
        }),
    }
}

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("number pattern")
});
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("integer pattern"));

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Error {
    Error::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Validates a numeric literal and returns it trimmed but otherwise untouched,
///  so `10.00` stays `10.00`.
pub(crate) fn numeric_literal<'a>(
    field: &str,
    field_type: FieldType,
    value: &'a str,
) -> Result<&'a str> {
    let trimmed = value.trim();
    let pattern = if field_type == FieldType::Integer {
        &INTEGER
    } else {
        &NUMBER
    };
    if pattern.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(invalid(field, value, format!("not a {field_type:?} literal")))
    }
}

pub(crate) fn parse_date_time(field: &str, value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| invalid(field, value, "not a date"))
}

/// A date, or a date-time at exactly midnight. Any other time of day is
///  rejected rather than truncated.
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    let dt = parse_date_time(field, value)?;
    if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
        Ok(dt.date())
    } else {
        Err(invalid(field, value, "time of day on a date field"))
    }
}

pub(crate) fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(field, value, "not a boolean")),
    }
}

/// Doubles embedded single quotes, the escape both JPQL and SQL understand.
pub(crate) fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', "''")
}
