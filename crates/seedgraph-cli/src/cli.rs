//! CLI argument definitions for Seedgraph.
//!
//! Each command corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "seedgraph",
    version,
    about = "Dependency-ordered discovery of database seeders",
    long_about = "Seedgraph scans a project for seeder declarations, builds their dependency \
                  graph, and prints an order in which every seeder runs after the ones it \
                  depends on."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print seeders in the order they should run
    Order {
        /// Paths or glob patterns to scan (default: `scan.paths` from Seedgraph.toml)
        paths: Vec<String>,
        /// Print the order as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report every missing dependency and cycle
    Check {
        /// Paths or glob patterns to scan (default: `scan.paths` from Seedgraph.toml)
        paths: Vec<String>,
        /// Print problems as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse command-line arguments.
pub fn parse() -> Cli {
    Cli::parse()
}
