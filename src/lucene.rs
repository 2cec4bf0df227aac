use std::{
    borrow::Cow,
    fmt::{Display, Formatter, Result},
    sync::LazyLock,
};

use regex::Regex;

use crate::ast::{SortClause, SortDirection};

/// How a clause takes part in its enclosing boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Required,
    Prohibited,
    Optional,
}

impl Occurrence {
    fn prefix(&self) -> &'static str {
        match self {
            Occurrence::Required => "+",
            Occurrence::Prohibited => "-",
            Occurrence::Optional => "",
        }
    }
}

/// A one-sided range. Exactly one of `lower` / `upper` is set when built from
///  a comparison operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub field: String,
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub inclusive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanClause {
    pub query: SearchQuery,
    pub occurrence: Occurrence,
}

impl BooleanClause {
    pub fn new(query: SearchQuery, occurrence: Occurrence) -> Self {
        Self { query, occurrence }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BooleanQuery {
    pub clauses: Vec<BooleanClause>,
}

/// Search-index query tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    MatchAll,
    /// Tokens that must appear in order; a single token is a plain term match.
    Phrase { field: String, terms: Vec<String> },
    Range(RangeQuery),
    Boolean(BooleanQuery),
}

impl SearchQuery {
    pub fn phrase(field: impl Into<String>, terms: Vec<String>) -> Self {
        SearchQuery::Phrase {
            field: field.into(),
            terms,
        }
    }

    /// Matches when any of `queries` matches.
    pub fn any_of(queries: Vec<SearchQuery>) -> Self {
        SearchQuery::Boolean(BooleanQuery {
            clauses: queries
                .into_iter()
                .map(|q| BooleanClause::new(q, Occurrence::Optional))
                .collect(),
        })
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Index-side analysis of free text: lowercases, splits on anything that is
///  not alphanumeric and drops stop words. A literal made only of stop words
///  analyzes to nothing.
pub fn analyze(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .filter(|token| !STOP_WORDS.contains(&token.as_str()))
        .collect()
}

static PHRASE_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\"]"#).expect("phrase escape pattern"));

fn escape_phrase(s: &str) -> Cow<'_, str> {
    PHRASE_SPECIAL.replace_all(s, r"\$0")
}

/// Whitespace and bracket characters would end a range term early.
static RANGE_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\s"\\\[\]{}]"#).expect("range escape pattern"));

fn range_bound(bound: Option<&str>) -> Cow<'_, str> {
    match bound {
        None => Cow::Borrowed("*"),
        Some(b) if b.is_empty() || b == "*" || RANGE_SPECIAL.is_match(b) => {
            Cow::Owned(format!("\"{}\"", escape_phrase(b)))
        }
        Some(b) => Cow::Borrowed(b),
    }
}

impl Display for RangeQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let (open, close) = if self.inclusive {
            ('[', ']')
        } else {
            ('{', '}')
        };
        write!(
            f,
            "{}:{open}{} TO {}{close}",
            self.field,
            range_bound(self.lower.as_deref()),
            range_bound(self.upper.as_deref()),
        )
    }
}

impl Display for BooleanQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", clause.occurrence.prefix())?;
            match &clause.query {
                SearchQuery::Boolean(inner) => write!(f, "({inner})")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

/// Renders in Lucene's classic query syntax.
impl Display for SearchQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SearchQuery::MatchAll => write!(f, "*:*"),
            SearchQuery::Phrase { field, terms } => {
                write!(f, "{field}:\"")?;
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", escape_phrase(term))?;
                }
                write!(f, "\"")
            }
            SearchQuery::Range(range) => write!(f, "{range}"),
            SearchQuery::Boolean(query) => write!(f, "{query}"),
        }
    }
}

/// A compiled search: the query plus everything the engine needs next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: SearchQuery,
    pub sort: Vec<SortClause>,
    pub start_index: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchRequest {
    /// Solr `sort` parameter, e.g. `name asc,price desc`.
    pub fn sort_param(&self) -> Option<String> {
        if self.sort.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .sort
            .iter()
            .map(|s| {
                let dir = match s.direction {
                    SortDirection::Asc => "asc",
                    SortDirection::Desc => "desc",
                };
                format!("{} {dir}", s.field)
            })
            .collect();
        Some(parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_display() {
        let q = SearchQuery::phrase("catalogCode", vec!["Sports".into()]);
        assert_eq!(q.to_string(), r#"catalogCode:"Sports""#);
        let q = SearchQuery::phrase("name", vec!["big".into(), "red".into()]);
        assert_eq!(q.to_string(), r#"name:"big red""#);
        let q = SearchQuery::phrase("code", vec![r#"a"b\c"#.into()]);
        assert_eq!(q.to_string(), r#"code:"a\"b\\c""#);
    }

    #[test]
    fn test_range_display() {
        let q = RangeQuery {
            field: "price".into(),
            lower: Some("10.00".into()),
            upper: None,
            inclusive: false,
        };
        assert_eq!(q.to_string(), "price:{10.00 TO *}");
        let q = RangeQuery {
            field: "price".into(),
            lower: None,
            upper: Some("5".into()),
            inclusive: true,
        };
        assert_eq!(q.to_string(), "price:[* TO 5]");
    }

    #[test]
    fn test_range_bound_quoting() {
        let q = RangeQuery {
            field: "startDate".into(),
            lower: None,
            upper: Some("2024-03-01 00:00:00".into()),
            inclusive: false,
        };
        assert_eq!(q.to_string(), r#"startDate:{* TO "2024-03-01 00:00:00"}"#);
        let q = RangeQuery {
            field: "code".into(),
            lower: Some("a]b".into()),
            upper: None,
            inclusive: true,
        };
        assert_eq!(q.to_string(), r#"code:["a]b" TO *]"#);
    }

    #[test]
    fn test_analyze() {
        assert_eq!(analyze("The Big-Red ball"), vec!["big", "red", "ball"]);
        assert!(analyze("the and of").is_empty());
    }

    #[test]
    fn test_any_of() {
        let q = SearchQuery::any_of(vec![
            SearchQuery::phrase("storeCode", vec!["A".into()]),
            SearchQuery::phrase("storeCode", vec!["B".into()]),
        ]);
        assert_eq!(q.to_string(), r#"storeCode:"A" storeCode:"B""#);
    }

    #[test]
    fn test_boolean_display() {
        let inner = BooleanQuery {
            clauses: vec![
                BooleanClause::new(SearchQuery::phrase("a", vec!["1".into()]), Occurrence::Optional),
                BooleanClause::new(SearchQuery::phrase("b", vec!["2".into()]), Occurrence::Optional),
            ],
        };
        let outer = SearchQuery::Boolean(BooleanQuery {
            clauses: vec![
                BooleanClause::new(SearchQuery::MatchAll, Occurrence::Optional),
                BooleanClause::new(SearchQuery::phrase("c", vec!["3".into()]), Occurrence::Prohibited),
                BooleanClause::new(SearchQuery::Boolean(inner), Occurrence::Required),
            ],
        });
        assert_eq!(outer.to_string(), r#"*:* -c:"3" +(a:"1" b:"2")"#);
    }

    #[test]
    fn test_sort_param() {
        let request = SearchRequest {
            query: SearchQuery::MatchAll,
            sort: vec![SortClause::asc("name"), SortClause::desc("price")],
            start_index: None,
            limit: None,
        };
        assert_eq!(request.sort_param().as_deref(), Some("name asc,price desc"));
    }
}
