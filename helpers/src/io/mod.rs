//! I/O helpers for the helper functions and the CLI.

pub mod config;
pub mod document;
pub mod env;
