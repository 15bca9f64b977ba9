//! Operation: print the seeding order.

use std::path::Path;

use seedgraph_core::unit::SeedUnit;
use seedgraph_resolver::SeedResolver;
use seedgraph_util::errors::SeedError;

use crate::scan_plan;

/// Options for `seedgraph order`.
#[derive(Debug, Default)]
pub struct OrderOptions {
    /// Paths or globs overriding the configured scan paths.
    pub paths: Vec<String>,
    /// Emit JSON instead of one identifier per line.
    pub json: bool,
}

/// Resolve the seeding order for the project and print it to stdout.
pub fn order(project_dir: &Path, opts: &OrderOptions) -> miette::Result<()> {
    let units = resolve_order(project_dir, &opts.paths)?;
    print!("{}", render_order(&units, opts.json)?);
    seedgraph_util::progress::status("Resolved", &format!("{} seeder(s)", units.len()));
    Ok(())
}

/// Scan and resolve without printing.
pub fn resolve_order(project_dir: &Path, paths: &[String]) -> miette::Result<Vec<SeedUnit>> {
    let plan = scan_plan(project_dir, paths)?;
    let mut resolver = SeedResolver::new(plan.options);
    Ok(resolver.discover(&plan.patterns)?)
}

/// Render an order as text (one identifier per line) or a JSON array.
pub fn render_order(units: &[SeedUnit], json: bool) -> miette::Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(units).map_err(|e| SeedError::Generic {
            message: format!("Failed to serialize seeding order: {e}"),
        })?;
        out.push('\n');
        return Ok(out);
    }
    Ok(units
        .iter()
        .map(|u| format!("{}\n", u.identifier()))
        .collect())
}
