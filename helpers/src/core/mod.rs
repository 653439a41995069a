//! Pure value logic shared by every helper function.
//!
//! Core modules must be free of I/O side effects. They take values by
//! reference, return freshly built values, and hold no state between calls.

pub mod collection_filter;
pub mod equality;
pub mod error;
pub mod flatten;
pub mod homogeneity;
pub mod key_set;
pub mod mutation;
pub mod projection;
pub mod value;
