use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A declared, idempotent data-seeding operation.
///
/// Identity is the canonical `identifier` plus its declared dependencies;
/// `source` records where the unit was found and is only used for
/// diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SeedUnit {
    identifier: String,
    depends_on: Vec<String>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl SeedUnit {
    /// Create a unit from already-canonical identifiers.
    pub fn new<I, S>(identifier: impl Into<String>, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            source: None,
        }
    }

    /// Record the file the unit was extracted from (builder pattern).
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Declared dependency identifiers, in declaration order.
    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns `true` if the unit declares no dependencies.
    pub fn is_root(&self) -> bool {
        self.depends_on.is_empty()
    }
}

impl PartialEq for SeedUnit {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.depends_on == other.depends_on
    }
}

impl Eq for SeedUnit {}

impl fmt::Display for SeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}
