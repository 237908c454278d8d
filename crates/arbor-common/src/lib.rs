//! Common utilities for the arbor crates.
//!
//! This crate provides shared infrastructure used by all arbor components:
//! - **Warning System** - colored terminal output for recoverable irregularities

pub mod warning;
