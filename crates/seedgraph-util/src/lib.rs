//! Shared utilities for seedgraph.
//!
//! This crate provides cross-cutting concerns used by the other seedgraph
//! crates: the unified error type, filesystem helpers, and Cargo-style
//! terminal status lines.

pub mod errors;
pub mod fs;
pub mod progress;
