//! Seeder ordering engine: builds the dependency graph of discovered seed
//! units, resolves one deterministic execution order, and reports cycles
//! and missing dependencies.

pub mod error;
pub mod graph;
pub mod resolver;
pub mod validate;

pub use error::ResolveError;
pub use resolver::{resolve, SeedResolver};
pub use validate::{validate_units, ValidationError, ValidationReport};
