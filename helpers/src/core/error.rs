//! Errors raised by the value functions.
//!
//! Every error is a deterministic rejection of one call's input. Nothing is
//! retried and no state is left behind.

use crate::core::value::{Kind, Type};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunctionError {
    /// A value could not be reduced to a form the comparator or path
    /// resolver can use.
    #[error("type conversion failed: {0}")]
    TypeConversion(String),
    #[error(
        "value must be a collection of elements of the same type: element {index} is {found}, expected {expected}"
    )]
    HeterogeneousCollection {
        index: usize,
        expected: Type,
        found: Type,
    },
    #[error("{operation}: first parameter must be an object or map, got {found}")]
    UnsupportedValueType {
        operation: &'static str,
        found: Kind,
    },
    #[error("invalid operation '{0}': expected one of write_all, write_value, write_safe")]
    InvalidPolicy(String),
    #[error("{0} value has no children")]
    NotComposite(Kind),
    #[error("key '{key}' has type {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: Type,
        found: Type,
    },
}

impl FunctionError {
    pub fn type_conversion(msg: impl Into<String>) -> Self {
        Self::TypeConversion(msg.into())
    }
}

pub type FunctionResult<T> = Result<T, FunctionError>;
