//! Operation: validate the seeder graph without ordering it.
//!
//! Unlike `order`, every problem is reported before the command fails.

use std::path::Path;

use seedgraph_resolver::{SeedResolver, ValidationError, ValidationReport};
use seedgraph_util::errors::SeedError;

use crate::scan_plan;

/// Options for `seedgraph check`.
#[derive(Debug, Default)]
pub struct CheckOptions {
    pub paths: Vec<String>,
    pub json: bool,
}

/// Validate the project's seeders and print the findings.
///
/// Fails with [`SeedError::Validation`] when any problem was found.
pub fn check(project_dir: &Path, opts: &CheckOptions) -> miette::Result<()> {
    let (errors, seeders) = collect_problems(project_dir, &opts.paths)?;
    print!("{}", render_report(&errors, opts.json)?);

    if errors.is_empty() {
        seedgraph_util::progress::status("Checked", &format!("{seeders} seeder(s)"));
        Ok(())
    } else {
        seedgraph_util::progress::status_warn(
            "Checked",
            &format!("{seeders} seeder(s), {} problem(s)", errors.len()),
        );
        Err(SeedError::Validation {
            count: errors.len(),
        }
        .into())
    }
}

/// Scan and validate without printing. Also returns the number of
/// seeders scanned.
pub fn collect_problems(
    project_dir: &Path,
    paths: &[String],
) -> miette::Result<(Vec<ValidationError>, usize)> {
    let plan = scan_plan(project_dir, paths)?;
    let mut resolver = SeedResolver::new(plan.options);
    if let Err(e) = resolver.discover(&plan.patterns) {
        tracing::debug!("Resolution failed, collecting all problems: {e}");
    }
    Ok((resolver.validate(), resolver.units().len()))
}

/// Render validation errors as a text report or a JSON array.
pub fn render_report(errors: &[ValidationError], json: bool) -> miette::Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(errors).map_err(|e| SeedError::Generic {
            message: format!("Failed to serialize validation report: {e}"),
        })?;
        out.push('\n');
        return Ok(out);
    }
    let report = ValidationReport::from(errors.to_vec());
    if report.is_empty() {
        Ok(format!("{report}\n"))
    } else {
        Ok(report.to_string())
    }
}
