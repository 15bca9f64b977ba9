//! Fatal resolution errors.

use miette::Diagnostic;
use thiserror::Error;

use crate::validate::ValidationError;

/// Why no seeding order could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ResolveError {
    /// A seeder depends on itself, directly or transitively.
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(seedgraph::circular_dependency),
        help("Remove one of the dependsOn entries along this chain")
    )]
    CircularDependency { cycle: Vec<String> },

    /// A declared dependency was not discovered.
    #[error("Seeder '{unit}' depends on '{missing}', which was not discovered")]
    #[diagnostic(
        code(seedgraph::missing_dependency),
        help("Check that the dependency is tagged as a seeder, is not abstract, and lives under a scanned path")
    )]
    MissingDependency { unit: String, missing: String },

    /// Two files declare the same seeder with different dependencies.
    #[error("Seeder '{identifier}' is declared in {first} and again in {second} with different dependencies")]
    #[diagnostic(
        code(seedgraph::duplicate_declaration),
        help("Remove or rename one of the declarations")
    )]
    DuplicateDeclaration {
        identifier: String,
        first: String,
        second: String,
    },
}

impl From<ValidationError> for ResolveError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::CircularDependency { cycle } => Self::CircularDependency { cycle },
            ValidationError::MissingDependency { unit, missing } => {
                Self::MissingDependency { unit, missing }
            }
            ValidationError::DuplicateDeclaration {
                identifier,
                first,
                second,
            } => Self::DuplicateDeclaration {
                identifier,
                first,
                second,
            },
        }
    }
}
