//! Command dispatch and handler modules.

mod check;
mod order;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Order { paths, json } => order::exec(paths, json),
        Command::Check { paths, json } => check::exec(paths, json),
    }
}
