use epql_compiler::{
    QueryCompiler,
    ast::{Conjunction, EpQlTerm, FieldDescriptor, FieldType, Operator, SortClause},
    config::CompilerConfig,
    resolve::FieldTable,
    translate::{Dialect, Error, Result},
};
use tracing_subscriber::EnvFilter;

fn catalog_fields() -> FieldTable {
    FieldTable::new()
        .with_field("CatalogCode", FieldDescriptor::new("c.catalogCode", FieldType::String))
        .with_field("ListPrice", FieldDescriptor::new("c.listPrice", FieldType::Decimal))
        .with_field("StartDate", FieldDescriptor::new("c.startDate", FieldType::Date))
        .with_analyzed_field("ProductName", FieldDescriptor::new("c.productName", FieldType::Text))
}

/// `CatalogCode = 'Sports' AND ListPrice > 10.00 AND NOT (StartDate < 2024-01-01 OR ProductName = 'Tennis Racket')`
fn sample(compiler: &mut QueryCompiler, fields: &FieldTable) -> Result<()> {
    compiler.add_term(
        fields,
        Conjunction::None,
        &EpQlTerm::new("CatalogCode", Operator::Equal, "Sports"),
    )?;
    compiler.add_term(
        fields,
        Conjunction::And,
        &EpQlTerm::new("ListPrice", Operator::More, "10.00"),
    )?;
    compiler.open_group(Conjunction::Not)?;
    compiler.add_term(
        fields,
        Conjunction::None,
        &EpQlTerm::new("StartDate", Operator::Less, "2024-01-01"),
    )?;
    compiler.add_term(
        fields,
        Conjunction::Or,
        &EpQlTerm::new("ProductName", Operator::Equal, "Tennis Racket"),
    )?;
    compiler.close_group()?;
    compiler.set_sort_clauses(vec![SortClause::desc("c.listPrice")]);
    Ok(())
}

fn run(config: CompilerConfig) -> Result<()> {
    let fields = catalog_fields();
    for dialect in [Dialect::Jpql, Dialect::Sql, Dialect::Search] {
        let mut config = config.clone();
        config.dialect = dialect;
        if config.prefix.is_none() {
            config.prefix = Some("SELECT c FROM CatalogImpl c".into());
        }

        let mut compiler = QueryCompiler::new(config)?;
        sample(&mut compiler, &fields)?;
        let compiled = compiler.finish()?;

        println!("{dialect:?}: {compiled}");
        if let Some(sort) = compiled.as_search().and_then(|s| s.sort_param()) {
            println!("{dialect:?} sort: {sort}");
        }
    }
    Ok(())
}

/// An optional TOML file overrides the defaults (dialect is cycled anyway).
#[cfg(feature = "serde")]
fn load_config() -> Result<CompilerConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("cannot read {path}: {e}")))?;
            CompilerConfig::from_toml_str(&text)
        }
        None => Ok(CompilerConfig::default()),
    }
}

#[cfg(not(feature = "serde"))]
fn load_config() -> Result<CompilerConfig> {
    Ok(CompilerConfig::default())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = load_config().and_then(run) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
