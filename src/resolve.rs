use std::collections::HashMap;

use tracing::trace;

use crate::{
    ast::{EpQlTerm, FieldDescriptor, ResolvedTerm},
    translate::{Error, Result},
};

/// The metadata service seam: maps a logical EPQL field to its native field
///  and resolves the literal(s). Any closure with the right shape works:
///
/// ```rust
/// # use epql_compiler::{ast::{EpQlTerm, FieldDescriptor, FieldType, ResolvedTerm}, resolve::FieldResolver, translate::Error};
/// let resolver = |term: &EpQlTerm| match term.field.as_str() {
///     "ProductCode" => Ok(ResolvedTerm::new(
///         FieldDescriptor::new("productCode", FieldType::String),
///         term.values.clone(),
///     )),
///     other => Err(Error::UnknownField(other.to_string())),
/// };
/// # let term = EpQlTerm::new("ProductCode", epql_compiler::ast::Operator::Equal, "P1");
/// # assert!(resolver.resolve(&term).is_ok());
/// ```
pub trait FieldResolver {
    fn resolve(&self, term: &EpQlTerm) -> Result<ResolvedTerm>;
}

impl<F> FieldResolver for F
where
    F: Fn(&EpQlTerm) -> Result<ResolvedTerm>,
{
    fn resolve(&self, term: &EpQlTerm) -> Result<ResolvedTerm> {
        (self)(term)
    }
}

/// A static logical-name → native-field table. Values are handed over as
///  written; any text analysis is up to the target dialect.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    fields: HashMap<String, FieldDescriptor>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, logical: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(logical.into(), descriptor);
        self
    }

    /// Free-text field: search matches run the literal through
    ///  [`crate::lucene::analyze`] first.
    pub fn with_analyzed_field(
        self,
        logical: impl Into<String>,
        descriptor: FieldDescriptor,
    ) -> Self {
        self.with_field(logical, descriptor.analyzed())
    }

    pub fn get(&self, logical: &str) -> Option<&FieldDescriptor> {
        self.fields.get(logical)
    }
}

impl FieldResolver for FieldTable {
    fn resolve(&self, term: &EpQlTerm) -> Result<ResolvedTerm> {
        let descriptor = self
            .get(&term.field)
            .ok_or_else(|| Error::UnknownField(term.field.clone()))?;
        trace!(logical = %term.field, native = %descriptor.native_name, values = ?term.values, "resolved term");
        Ok(ResolvedTerm::new(descriptor.clone(), term.values.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldType, Operator};

    fn table() -> FieldTable {
        FieldTable::new()
            .with_field("CatalogCode", FieldDescriptor::new("catalogCode", FieldType::String))
            .with_analyzed_field("ProductName", FieldDescriptor::new("productName", FieldType::Text))
    }

    #[test]
    fn test_resolve_plain_field() {
        let term = EpQlTerm::new("CatalogCode", Operator::Equal, "Sports Stuff");
        let resolved = table().resolve(&term).unwrap();
        assert_eq!(resolved.field, "catalogCode");
        assert_eq!(resolved.values, vec!["Sports Stuff"]);
        assert!(!resolved.descriptor.analyzed);
    }

    #[test]
    fn test_resolve_analyzed_field() {
        // values stay raw, only the descriptor is marked
        let term = EpQlTerm::new("ProductName", Operator::Equal, "The Tennis Racket");
        let resolved = table().resolve(&term).unwrap();
        assert_eq!(resolved.values, vec!["The Tennis Racket"]);
        assert!(resolved.descriptor.analyzed);
        assert!(!resolved.descriptor.multi_valued);
    }

    #[test]
    fn test_get() {
        let table = table();
        assert_eq!(table.get("CatalogCode").map(|d| d.native_name.as_str()), Some("catalogCode"));
        assert!(table.get("ProductName").is_some_and(|d| d.analyzed));
        assert_eq!(table.get("catalogCode"), None);
    }

    #[test]
    fn test_unknown_field() {
        let term = EpQlTerm::new("Nope", Operator::Equal, "x");
        assert_eq!(
            table().resolve(&term),
            Err(Error::UnknownField("Nope".into()))
        );
    }
}
