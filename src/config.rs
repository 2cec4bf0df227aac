use chrono::format::{Item, StrftimeItems};

use crate::translate::{Dialect, Error, Result};

/// Solr's canonical date form.
pub const DEFAULT_SEARCH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Settings for one compilation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CompilerConfig {
    pub dialect: Dialect,
    /// Relational boilerplate placed before the WHERE clause, e.g.
    ///  `SELECT c FROM CatalogImpl c`. Ignored by the search dialect.
    pub prefix: Option<String>,
    /// chrono format used for date range bounds in the search dialect.
    pub search_date_format: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            prefix: None,
            search_date_format: DEFAULT_SEARCH_DATE_FORMAT.to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// chrono panics when formatting with a broken format string, so catch
    ///  that before any date is rendered.
    pub fn validate(&self) -> Result<()> {
        if self.search_date_format.is_empty() {
            return Err(Error::Config("search_date_format is empty".into()));
        }
        if StrftimeItems::new(&self.search_date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "invalid search_date_format: {}",
                self.search_date_format
            )));
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
