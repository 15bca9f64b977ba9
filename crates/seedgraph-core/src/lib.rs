//! Core data types for seedgraph.
//!
//! This crate defines the values every other crate passes around: the
//! immutable [`unit::SeedUnit`], canonical identifier handling, the
//! `Seedgraph.toml` project configuration, and the [`registry::Seeder`]
//! trait for explicitly registered seed suites.
//!
//! This crate performs no scanning; the only I/O is reading configuration.

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "Seedgraph.toml";

pub mod config;
pub mod identifier;
pub mod registry;
pub mod unit;
