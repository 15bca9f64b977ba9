use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for seedgraph operations.
#[derive(Debug, Error, Diagnostic)]
pub enum SeedError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed `Seedgraph.toml`.
    #[error("Config error: {message}")]
    #[diagnostic(
        code(seedgraph::config),
        help("Check your Seedgraph.toml for syntax errors")
    )]
    Config { message: String },

    /// The validation pass reported one or more problems.
    #[error("Found {count} problem(s) in the seeder graph")]
    #[diagnostic(
        code(seedgraph::validation),
        help("Run `seedgraph check` to list every problem")
    )]
    Validation { count: usize },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
