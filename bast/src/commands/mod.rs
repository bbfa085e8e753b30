//! Command modules for the bast CLI.
//!
//! This module contains implementations for all available subcommands.
//! Each subcommand is implemented in its own file following a standardized pattern.

pub mod common;

pub mod transpile;
pub mod validate;

// Re-export command types and functions (used by main.rs)
#[allow(unused_imports)]
pub use transpile::{run_transpile, TranspileArgs};
#[allow(unused_imports)]
pub use validate::{run_validate, ValidateArgs};
