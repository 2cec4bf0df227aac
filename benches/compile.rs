use criterion::{Criterion, criterion_group, criterion_main};
use epql_compiler::{
    compile,
    ast::{Conjunction, EpQlTerm, FieldDescriptor, FieldType, Operator},
    config::CompilerConfig,
    resolve::FieldTable,
    translate::Dialect,
};

fn fields() -> FieldTable {
    FieldTable::new()
        .with_field("Code", FieldDescriptor::new("code", FieldType::String))
        .with_field("Price", FieldDescriptor::new("price", FieldType::Decimal))
        .with_field("StartDate", FieldDescriptor::new("startDate", FieldType::Date))
        .with_analyzed_field("Name", FieldDescriptor::new("name", FieldType::Text))
}

fn terms() -> Vec<(Conjunction, EpQlTerm)> {
    let mut terms = vec![(Conjunction::None, EpQlTerm::new("Code", Operator::Equal, "ABC"))];
    for i in 0..16 {
        let (conjunction, term) = match i % 4 {
            0 => (Conjunction::And, EpQlTerm::new("Price", Operator::More, "10.00")),
            1 => (Conjunction::Or, EpQlTerm::new("Name", Operator::Equal, "The Big Red Ball")),
            2 => (Conjunction::Not, EpQlTerm::new("Code", Operator::NotEqual, "XYZ")),
            _ => (Conjunction::And, EpQlTerm::new("StartDate", Operator::LessOrEqual, "2024-03-01")),
        };
        terms.push((conjunction, term));
    }
    terms
}

fn compile_all(fields: &FieldTable, terms: &[(Conjunction, EpQlTerm)], dialect: Dialect) {
    let compiled = compile(CompilerConfig::for_dialect(dialect), fields, terms, vec![]);
    _ = std::hint::black_box(compiled.map(|c| c.to_string()));
}

fn criterion_benchmark(c: &mut Criterion) {
    let fields = fields();
    let terms = terms();
    c.bench_function("jpql", |b| b.iter(|| compile_all(&fields, &terms, Dialect::Jpql)));
    c.bench_function("sql", |b| b.iter(|| compile_all(&fields, &terms, Dialect::Sql)));
    c.bench_function("search", |b| b.iter(|| compile_all(&fields, &terms, Dialect::Search)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
