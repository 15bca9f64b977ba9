//! Handler for `seedgraph order`.

use miette::Result;

use seedgraph_ops::ops_order::{self, OrderOptions};

pub fn exec(paths: Vec<String>, json: bool) -> Result<()> {
    let cwd = std::env::current_dir().map_err(seedgraph_util::errors::SeedError::Io)?;
    ops_order::order(&cwd, &OrderOptions { paths, json })
}
