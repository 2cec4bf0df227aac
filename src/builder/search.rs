use crate::{
    ast::{Conjunction, Operator},
    lucene::{BooleanClause, BooleanQuery, Occurrence, SearchQuery},
    translate::Polarity,
};

/// Occurrence a clause starts out with, before the next term can revise it.
pub fn initial_occurrence(operator: Operator, conjunction: Conjunction) -> Occurrence {
    match (Polarity::of(operator, conjunction), conjunction) {
        (Polarity::Negative, _) => Occurrence::Prohibited,
        (Polarity::Positive, Conjunction::Or) => Occurrence::Optional,
        (Polarity::Positive, _) => Occurrence::Required,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    clause: BooleanClause,
    /// Conjunction the clause arrived with. A clause joined by AND stays
    ///  bound to its predecessor and is not demoted by a following OR.
    conjunction: Conjunction,
}

/// What the previous clause becomes once the next conjunction is known.
///  Prohibited clauses are never touched.
pub fn revise(previous: Occurrence, previous_conjunction: Conjunction, next: Conjunction) -> Occurrence {
    match (previous, next) {
        (Occurrence::Prohibited, _) => Occurrence::Prohibited,
        (_, Conjunction::And) => Occurrence::Required,
        (_, Conjunction::Or) if previous_conjunction != Conjunction::And => Occurrence::Optional,
        (occurrence, _) => occurrence,
    }
}

/// Folds search clauses left to right into one flat boolean query.
#[derive(Debug, Clone, Default)]
pub struct SearchQueryBuilder {
    clauses: Vec<Pending>,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn add_clause(&mut self, conjunction: Conjunction, query: SearchQuery, operator: Operator) {
        let occurrence = initial_occurrence(operator, conjunction);

        // Only the immediately preceding clause may change.
        if let Some(last) = self.clauses.last_mut() {
            last.clause.occurrence = revise(last.clause.occurrence, last.conjunction, conjunction);
        }

        self.clauses.push(Pending {
            clause: BooleanClause::new(query, occurrence),
            conjunction,
        });

        // A query made only of prohibited clauses matches nothing, so a leading
        //  negation needs something positive to subtract from.
        if self.clauses.len() == 1 && occurrence == Occurrence::Prohibited {
            self.clauses.insert(
                0,
                Pending {
                    clause: BooleanClause::new(SearchQuery::MatchAll, Occurrence::Optional),
                    conjunction: Conjunction::None,
                },
            );
        }
    }

    pub fn occurrences(&self) -> Vec<Occurrence> {
        self.clauses.iter().map(|p| p.clause.occurrence).collect()
    }

    /// The compiled query; match-everything when no clause survived.
    pub fn build(self) -> SearchQuery {
        if self.clauses.is_empty() {
            SearchQuery::MatchAll
        } else {
            SearchQuery::Boolean(self.into_boolean())
        }
    }

    /// The query as a nested clause, or `None` if nothing survived.
    pub fn build_group(self) -> Option<SearchQuery> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(SearchQuery::Boolean(self.into_boolean()))
        }
    }

    fn into_boolean(self) -> BooleanQuery {
        BooleanQuery {
            clauses: self.clauses.into_iter().map(|p| p.clause).collect(),
        }
    }
}
