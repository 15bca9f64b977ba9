//! Check command implementation.

use miette::Result;

use seedgraph_ops::ops_check::{self, CheckOptions};

pub fn exec(paths: Vec<String>, json: bool) -> Result<()> {
    let cwd = std::env::current_dir().map_err(seedgraph_util::errors::SeedError::Io)?;
    ops_check::check(&cwd, &CheckOptions { paths, json })
}
