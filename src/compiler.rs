use std::fmt::{Display, Formatter};

use tracing::debug;

use crate::{
    ast::{Conjunction, EpQlTerm, Operator, SortClause},
    builder::{Clauses, QueryBuilder},
    config::CompilerConfig,
    lucene::{SearchQuery, SearchRequest},
    resolve::FieldResolver,
    to_sql::RelationalStatement,
    translate::{Dialect, Error, NativeQuery, Result, SubQueryBuilder},
};

/// The ready-to-execute result of one compilation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledQuery {
    Relational(RelationalStatement),
    Search(SearchRequest),
}

impl CompiledQuery {
    /// True when no term survived and the query selects everything.
    pub fn is_match_all(&self) -> bool {
        match self {
            CompiledQuery::Relational(statement) => statement.clauses.is_empty(),
            CompiledQuery::Search(request) => request.query == SearchQuery::MatchAll,
        }
    }

    pub fn sort(&self) -> &[SortClause] {
        match self {
            CompiledQuery::Relational(statement) => &statement.sort,
            CompiledQuery::Search(request) => &request.sort,
        }
    }

    pub fn as_relational(&self) -> Option<&RelationalStatement> {
        match self {
            CompiledQuery::Relational(statement) => Some(statement),
            CompiledQuery::Search(_) => None,
        }
    }

    pub fn as_search(&self) -> Option<&SearchRequest> {
        match self {
            CompiledQuery::Search(request) => Some(request),
            CompiledQuery::Relational(_) => None,
        }
    }
}

/// Relational statements print as their full text, searches as the Lucene
///  query string (sorting travels separately, see [`SearchRequest::sort_param`]).
impl Display for CompiledQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompiledQuery::Relational(statement) => write!(f, "{statement}"),
            CompiledQuery::Search(request) => write!(f, "{}", request.query),
        }
    }
}

/// Drives one compilation pass. The parser feeds terms in the order they
///  appear, optionally opening and closing parenthesized groups, then sets
///  the sort order and calls [`QueryCompiler::finish`].
#[derive(Debug)]
pub struct QueryCompiler {
    config: CompilerConfig,
    sub_queries: SubQueryBuilder,
    root: QueryBuilder,
    /// Open groups, innermost last, with the conjunction each was opened with.
    groups: Vec<(Conjunction, QueryBuilder)>,
    sort: Vec<SortClause>,
    start_index: Option<u32>,
    limit: Option<u32>,
}

impl QueryCompiler {
    pub fn new(config: CompilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::with_config(CompilerConfig::for_dialect(dialect))
    }

    fn with_config(config: CompilerConfig) -> Self {
        Self {
            sub_queries: SubQueryBuilder::new(&config),
            root: QueryBuilder::new(config.dialect),
            groups: Vec::new(),
            sort: Vec::new(),
            start_index: None,
            limit: None,
            config,
        }
    }

    /// Overrides the configured relational prefix for this pass.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = Some(prefix.into());
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    fn current(&mut self) -> &mut QueryBuilder {
        match self.groups.last_mut() {
            Some((_, builder)) => builder,
            None => &mut self.root,
        }
    }

    /// Resolves `term`, compiles it and folds it in.
    pub fn add_term<R>(&mut self, resolver: &R, conjunction: Conjunction, term: &EpQlTerm) -> Result<()>
    where
        R: FieldResolver + ?Sized,
    {
        self.current().check_conjunction(conjunction)?;
        let resolved = resolver.resolve(term)?;
        let query = self.sub_queries.build(&resolved, term)?;
        self.add_clause(conjunction, query, term.operator)
    }

    /// Folds an already compiled term in. `None` is a term that was filtered
    ///  out upstream and is skipped.
    pub fn add_clause(
        &mut self,
        conjunction: Conjunction,
        query: Option<NativeQuery>,
        operator: Operator,
    ) -> Result<()> {
        self.current().add_clause(conjunction, query, operator)
    }

    pub fn open_group(&mut self, conjunction: Conjunction) -> Result<()> {
        self.current().check_conjunction(conjunction)?;
        debug!(?conjunction, depth = self.groups.len() + 1, "opening group");
        self.groups
            .push((conjunction, QueryBuilder::new(self.config.dialect)));
        Ok(())
    }

    /// Closes the innermost group and adds it to its parent as one clause.
    pub fn close_group(&mut self) -> Result<()> {
        let (conjunction, builder) = self
            .groups
            .pop()
            .ok_or(Error::UnbalancedGroup("no group to close"))?;
        debug!(?conjunction, depth = self.groups.len() + 1, clauses = builder.len(), "closing group");
        let group = builder.build_group();
        self.current().add_clause(conjunction, group, Operator::Equal)
    }

    pub fn set_sort_clauses(&mut self, sort: Vec<SortClause>) {
        self.sort = sort;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = Some(limit);
    }

    pub fn set_start_index(&mut self, start_index: u32) {
        self.start_index = Some(start_index);
    }

    pub fn finish(self) -> Result<CompiledQuery> {
        if !self.groups.is_empty() {
            return Err(Error::UnbalancedGroup("group left open"));
        }
        let dialect = self.config.dialect;
        debug!(
            ?dialect,
            terms = self.root.terms_seen(),
            clauses = self.root.len(),
            sort = self.sort.len(),
            "finishing query"
        );

        let compiled = match self.root.into_clauses() {
            Clauses::Relational(builder) => CompiledQuery::Relational(RelationalStatement {
                dialect: builder.dialect(),
                prefix: self.config.prefix,
                clauses: builder.build(),
                sort: self.sort,
                start_index: self.start_index,
                limit: self.limit,
            }),
            Clauses::Search(builder) => CompiledQuery::Search(SearchRequest {
                query: builder.build(),
                sort: self.sort,
                start_index: self.start_index,
                limit: self.limit,
            }),
        };
        Ok(compiled)
    }
}

/// Compiles a flat list of `(conjunction, term)` pairs in one go.
pub fn compile<R>(
    config: CompilerConfig,
    resolver: &R,
    terms: &[(Conjunction, EpQlTerm)],
    sort: Vec<SortClause>,
) -> Result<CompiledQuery>
where
    R: FieldResolver + ?Sized,
{
    let mut compiler = QueryCompiler::new(config)?;
    for (conjunction, term) in terms {
        compiler.add_term(resolver, *conjunction, term)?;
    }
    compiler.set_sort_clauses(sort);
    compiler.finish()
}
