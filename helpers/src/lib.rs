//! Query and reshape semi-structured dynamic values.
//!
//! Values are trees of null, bool, number, string, collection, object, and
//! map nodes, each carrying a declared type. The crate is split the same way
//! every command uses it:
//!
//! - **[`core`]**: Pure logic (equality, flattening, filtering, key sets,
//!   projection, conditional writes). No I/O, no shared state.
//! - **[`io`]**: JSON codec, config file, environment lookup.
//!
//! [`functions`] exposes the registered functions on top of both, and the
//! `helpers` binary wires them to a CLI.

pub mod core;
pub mod exit_codes;
pub mod functions;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
