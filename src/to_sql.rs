use std::fmt::{Display, Formatter, Result};

use crate::{
    ast::{Conjunction, SortClause, SortDirection},
    translate::{Literal, RelationalClause, RelationalDialect, RelationalQuery, escape_single_quotes, relational_operator},
};

#[derive(Debug, Clone, Copy)]
pub struct PrinterConfig {
    pub dialect: RelationalDialect,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            dialect: RelationalDialect::Jpql,
        }
    }
}

pub struct Printer<T> {
    tree: T,
    config: PrinterConfig,
}

impl<T> Printer<T> {
    pub fn new(tree: T, config: PrinterConfig) -> Self {
        Self { tree, config }
    }
}

pub trait ToSQL {
    fn to_sql(&self, out: &mut Formatter, conf: &PrinterConfig) -> Result;
}

impl<T> ToSQL for &T
where
    T: ToSQL + ?Sized,
{
    fn to_sql(&self, out: &mut Formatter, conf: &PrinterConfig) -> Result {
        (**self).to_sql(out, conf)
    }
}

impl<T> Display for Printer<T>
where
    T: ToSQL,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.tree.to_sql(f, &self.config)
    }
}

impl ToSQL for Literal {
    fn to_sql(&self, out: &mut Formatter, conf: &PrinterConfig) -> Result {
        match (self, conf.dialect) {
            (Literal::String(v), _) => write!(out, "'{}'", escape_single_quotes(v)),
            (Literal::Number(v), _) => write!(out, "{v}"),
            (Literal::Boolean(v), _) => write!(out, "{}", if *v { "TRUE" } else { "FALSE" }),
            // JDBC escape syntax is what JPQL providers accept for temporal literals
            (Literal::Date(d), RelationalDialect::Jpql) => write!(out, "{{d '{}'}}", d.format("%Y-%m-%d")),
            (Literal::Date(d), RelationalDialect::Sql) => write!(out, "DATE '{}'", d.format("%Y-%m-%d")),
            (Literal::DateTime(dt), RelationalDialect::Jpql) => {
                write!(out, "{{ts '{}'}}", dt.format("%Y-%m-%d %H:%M:%S"))
            }
            (Literal::DateTime(dt), RelationalDialect::Sql) => {
                write!(out, "TIMESTAMP '{}'", dt.format("%Y-%m-%d %H:%M:%S"))
            }
        }
    }
}

impl ToSQL for RelationalQuery {
    fn to_sql(&self, out: &mut Formatter, conf: &PrinterConfig) -> Result {
        match self {
            RelationalQuery::Comparison {
                field,
                operator,
                literal,
            } => {
                write!(out, "{field} {} ", relational_operator(*operator))?;
                literal.to_sql(out, conf)
            }
            RelationalQuery::InList {
                field,
                negated,
                literals,
            } => {
                write!(out, "{field} {}(", if *negated { "NOT IN " } else { "IN " })?;
                for (i, literal) in literals.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    literal.to_sql(out, conf)?;
                }
                write!(out, ")")
            }
            RelationalQuery::Group(clauses) => {
                write!(out, "(")?;
                clauses.as_slice().to_sql(out, conf)?;
                write!(out, ")")
            }
        }
    }
}

/// A WHERE body: clauses in arrival order, each joined by its own
///  conjunction. The first clause's conjunction only matters if it is NOT.
impl ToSQL for [RelationalClause] {
    fn to_sql(&self, out: &mut Formatter, conf: &PrinterConfig) -> Result {
        for (i, clause) in self.iter().enumerate() {
            let joiner = match (i, clause.conjunction) {
                (0, Conjunction::Not) => "NOT ",
                (0, _) => "",
                (_, Conjunction::Or) => " OR ",
                // `a NOT b` is not a predicate; NOT between terms means AND NOT
                (_, Conjunction::Not) => " AND NOT ",
                (_, Conjunction::And | Conjunction::None) => " AND ",
            };
            write!(out, "{joiner}")?;
            clause.query.to_sql(out, conf)?;
        }
        Ok(())
    }
}

impl ToSQL for [SortClause] {
    fn to_sql(&self, out: &mut Formatter, _: &PrinterConfig) -> Result {
        for (i, sort) in self.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            let dir = match sort.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            write!(out, "{} {dir}", sort.field)?;
        }
        Ok(())
    }
}

/// A finished JPQL or SQL statement: caller prefix, optional WHERE body and
///  optional ORDER BY postfix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalStatement {
    pub dialect: RelationalDialect,
    pub prefix: Option<String>,
    pub clauses: Vec<RelationalClause>,
    pub sort: Vec<SortClause>,
    pub start_index: Option<u32>,
    pub limit: Option<u32>,
}

impl RelationalStatement {
    fn printer<T: ToSQL>(&self, tree: T) -> Printer<T> {
        Printer::new(
            tree,
            PrinterConfig {
                dialect: self.dialect,
            },
        )
    }

    /// The WHERE body without the keyword; `None` means no filtering at all.
    pub fn where_clause(&self) -> Option<String> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(self.printer(self.clauses.as_slice()).to_string())
        }
    }

    /// The ORDER BY list without the keyword.
    pub fn order_by(&self) -> Option<String> {
        if self.sort.is_empty() {
            None
        } else {
            Some(self.printer(self.sort.as_slice()).to_string())
        }
    }
}

impl Display for RelationalStatement {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(prefix) = self.prefix.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            parts.push(prefix.to_string());
        }
        if let Some(body) = self.where_clause() {
            parts.push(format!("WHERE {body}"));
        }
        if let Some(order) = self.order_by() {
            parts.push(format!("ORDER BY {order}"));
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;
    use chrono::NaiveDate;

    fn cmp(field: &str, operator: Operator, literal: Literal) -> RelationalQuery {
        RelationalQuery::Comparison {
            field: field.into(),
            operator,
            literal,
        }
    }

    fn sql<T: ToSQL>(tree: T, dialect: RelationalDialect) -> String {
        Printer::new(tree, PrinterConfig { dialect }).to_string()
    }

    #[test]
    fn test_literals() {
        let date = Literal::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(sql(&date, RelationalDialect::Jpql), "{d '2024-01-31'}");
        assert_eq!(sql(&date, RelationalDialect::Sql), "DATE '2024-01-31'");
        let ts = Literal::DateTime(
            NaiveDate::from_ymd_opt(2024, 1, 31)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
        );
        assert_eq!(sql(&ts, RelationalDialect::Jpql), "{ts '2024-01-31 09:05:00'}");
        assert_eq!(sql(&ts, RelationalDialect::Sql), "TIMESTAMP '2024-01-31 09:05:00'");
        let s = Literal::String("aaa'bbb".into());
        assert_eq!(sql(&s, RelationalDialect::Sql), "'aaa''bbb'");
    }

    #[test]
    fn test_clause_joining() {
        let clauses = vec![
            RelationalClause {
                query: cmp("a", Operator::Equal, Literal::Number("1".into())),
                conjunction: Conjunction::Not,
            },
            RelationalClause {
                query: cmp("b", Operator::NotEqual, Literal::Number("2".into())),
                conjunction: Conjunction::Or,
            },
            RelationalClause {
                query: cmp("c", Operator::Less, Literal::Number("3".into())),
                conjunction: Conjunction::Not,
            },
        ];
        assert_eq!(
            sql(clauses.as_slice(), RelationalDialect::Jpql),
            "NOT a = 1 OR b <> 2 AND NOT c < 3"
        );
    }

    #[test]
    fn test_group_and_in_list() {
        let group = RelationalQuery::Group(vec![
            RelationalClause {
                query: RelationalQuery::InList {
                    field: "s".into(),
                    negated: false,
                    literals: vec![Literal::String("A".into()), Literal::String("B".into())],
                },
                conjunction: Conjunction::None,
            },
            RelationalClause {
                query: cmp("t", Operator::Equal, Literal::Boolean(false)),
                conjunction: Conjunction::And,
            },
        ]);
        assert_eq!(
            sql(&group, RelationalDialect::Sql),
            "(s IN ('A', 'B') AND t = FALSE)"
        );
    }

    #[test]
    fn test_statement() {
        let statement = RelationalStatement {
            dialect: RelationalDialect::Jpql,
            prefix: Some("SELECT c FROM CatalogImpl c".into()),
            clauses: vec![RelationalClause {
                query: cmp("c.code", Operator::Equal, Literal::String("ABC".into())),
                conjunction: Conjunction::None,
            }],
            sort: vec![SortClause::asc("c.code"), SortClause::desc("c.name")],
            start_index: None,
            limit: None,
        };
        assert_eq!(
            statement.to_string(),
            "SELECT c FROM CatalogImpl c WHERE c.code = 'ABC' ORDER BY c.code ASC, c.name DESC"
        );

        let bare = RelationalStatement {
            clauses: vec![],
            sort: vec![],
            ..statement
        };
        assert_eq!(bare.to_string(), "SELECT c FROM CatalogImpl c");
        assert_eq!(bare.where_clause(), None);
    }
}
