pub mod ast;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod lucene;
pub mod resolve;
pub mod to_sql;
pub mod translate;

pub use compiler::{CompiledQuery, QueryCompiler, compile};
