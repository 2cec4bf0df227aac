use crate::{
    ast::Conjunction,
    translate::{RelationalClause, RelationalDialect, RelationalQuery},
};

/// Collects JPQL/SQL predicates in arrival order. Joining them is left to the
///  printer, which only needs each clause's conjunction.
#[derive(Debug, Clone)]
pub struct RelationalQueryBuilder {
    dialect: RelationalDialect,
    clauses: Vec<RelationalClause>,
}

impl RelationalQueryBuilder {
    pub fn new(dialect: RelationalDialect) -> Self {
        Self {
            dialect,
            clauses: Vec::new(),
        }
    }

    pub fn dialect(&self) -> RelationalDialect {
        self.dialect
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn add_clause(&mut self, conjunction: Conjunction, query: RelationalQuery) {
        self.clauses.push(RelationalClause { query, conjunction });
    }

    pub fn build(self) -> Vec<RelationalClause> {
        self.clauses
    }

    /// The clauses as one parenthesized predicate, or `None` if nothing
    ///  survived.
    pub fn build_group(self) -> Option<RelationalQuery> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(RelationalQuery::Group(self.clauses))
        }
    }
}
