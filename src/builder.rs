use tracing::{debug, trace};

use crate::{
    ast::{Conjunction, Operator},
    translate::{Dialect, Error, NativeQuery, Result},
};

pub mod relational;
pub mod search;

pub use relational::RelationalQueryBuilder;
pub use search::SearchQueryBuilder;

#[derive(Debug, Clone)]
pub enum Clauses {
    Relational(RelationalQueryBuilder),
    Search(SearchQueryBuilder),
}

/// Per-pass clause accumulator for one expression (or one parenthesized
///  group). Never shared between passes.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    terms_seen: usize,
    clauses: Clauses,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect) -> Self {
        let clauses = match dialect.relational() {
            Some(relational) => Clauses::Relational(RelationalQueryBuilder::new(relational)),
            None => Clauses::Search(SearchQueryBuilder::new()),
        };
        Self {
            terms_seen: 0,
            clauses,
        }
    }

    /// Number of terms offered so far, including skipped ones.
    pub fn terms_seen(&self) -> usize {
        self.terms_seen
    }

    pub fn is_empty(&self) -> bool {
        match &self.clauses {
            Clauses::Relational(b) => b.is_empty(),
            Clauses::Search(b) => b.is_empty(),
        }
    }

    /// Checks that `conjunction` may introduce the next term.
    pub fn check_conjunction(&self, conjunction: Conjunction) -> Result<()> {
        if conjunction == Conjunction::None && self.terms_seen > 0 {
            return Err(Error::MisplacedConjunction);
        }
        Ok(())
    }

    /// Folds the next term in. A `None` query is a term that was filtered out
    ///  upstream: it is dropped without touching the clauses already there.
    pub fn add_clause(
        &mut self,
        conjunction: Conjunction,
        query: Option<NativeQuery>,
        operator: Operator,
    ) -> Result<()> {
        self.check_conjunction(conjunction)?;
        self.terms_seen += 1;

        let Some(query) = query else {
            debug!(?conjunction, term = self.terms_seen, "dropping filtered term");
            return Ok(());
        };

        match (&mut self.clauses, query) {
            (Clauses::Relational(b), NativeQuery::Relational(q)) => b.add_clause(conjunction, q),
            (Clauses::Search(b), NativeQuery::Search(q)) => b.add_clause(conjunction, q, operator),
            (clauses, query) => {
                return Err(Error::DialectMismatch {
                    expected: clauses.family(),
                    found: query.family(),
                });
            }
        }
        trace!(?conjunction, ?operator, clauses = self.len(), "added clause");
        Ok(())
    }

    pub fn len(&self) -> usize {
        match &self.clauses {
            Clauses::Relational(b) => b.len(),
            Clauses::Search(b) => b.len(),
        }
    }

    /// Closes this builder as a parenthesized sub-expression of its parent.
    pub fn build_group(self) -> Option<NativeQuery> {
        match self.clauses {
            Clauses::Relational(b) => b.build_group().map(NativeQuery::Relational),
            Clauses::Search(b) => b.build_group().map(NativeQuery::Search),
        }
    }

    pub fn into_clauses(self) -> Clauses {
        self.clauses
    }
}

impl Clauses {
    fn family(&self) -> &'static str {
        match self {
            Clauses::Relational(_) => "relational",
            Clauses::Search(_) => "search",
        }
    }
}
