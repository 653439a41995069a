//! Stable exit codes for the helpers CLI.

/// Command succeeded and its result was printed.
pub const OK: i32 = 0;
/// Invalid input, config, or I/O failure.
pub const INVALID: i32 = 1;
/// A function rejected its arguments (see `FunctionError`).
pub const FUNCTION_ERROR: i32 = 2;
