//! Seeder discovery: turns scan paths into [`SeedUnit`]s.
//!
//! [`scanner`] enumerates candidate files, [`extractor`] reads each one and
//! keeps the concrete, tagged seeders it declares.

pub mod extractor;
pub mod manifest;
pub mod php;
pub mod scanner;

use seedgraph_core::config::ScanConfig;
use seedgraph_core::unit::SeedUnit;

pub use extractor::extract_units;
pub use scanner::scan;

/// Suffix of seed manifest files, recognized regardless of `extensions`.
pub const MANIFEST_SUFFIX: &str = ".seed.toml";

/// Which files the scanner considers.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Source extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Glob patterns for files to leave out.
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            exclude: config.exclude.clone(),
        }
    }
}

/// Scan `patterns` and extract every seed unit found, in discovery order.
///
/// Units are not deduplicated here; the graph builder collapses repeated
/// identifiers.
pub fn discover_units<S: AsRef<str>>(patterns: &[S], options: &ScanOptions) -> Vec<SeedUnit> {
    let files = scan(patterns, options);
    extract_units(&files)
}
