//! Element type validation for collections.

use crate::core::error::{FunctionError, FunctionResult};
use crate::core::value::{Type, Typed};

/// Check that every element type is compatible with the first concrete one.
///
/// Untyped (`Dynamic`) elements are compatible with anything and do not
/// become the reference type. Empty collections are homogeneous.
pub fn ensure_homogeneous(elements: &[Typed]) -> FunctionResult<()> {
    let Some(expected) = elements
        .iter()
        .map(|element| &element.ty)
        .find(|ty| **ty != Type::Dynamic)
    else {
        return Ok(());
    };

    for (index, element) in elements.iter().enumerate() {
        if !expected.is_compatible(&element.ty) {
            return Err(FunctionError::HeterogeneousCollection {
                index,
                expected: expected.clone(),
                found: element.ty.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;
    use crate::test_support::{b, field, num, text};

    #[test]
    fn empty_collection_is_homogeneous() {
        assert!(ensure_homogeneous(&[]).is_ok());
    }

    #[test]
    fn objects_with_different_attributes_are_homogeneous() {
        let elements = vec![
            field(vec![("key1", text("a")), ("key4", Typed::inferred(Value::Null))]),
            field(vec![("key1", text("b")), ("key4", field(vec![]))]),
            field(vec![("key1", text("c")), ("key4", field(vec![("key5", b(true))]))]),
        ];
        assert!(ensure_homogeneous(&elements).is_ok());
    }

    #[test]
    fn untyped_nulls_do_not_fix_the_reference_type() {
        let elements = vec![Typed::inferred(Value::Null), text("a"), text("b")];
        assert!(ensure_homogeneous(&elements).is_ok());
    }

    #[test]
    fn mixed_scalars_are_rejected_at_first_offender() {
        let elements = vec![text("a"), text("b"), num(1), b(true)];
        let err = ensure_homogeneous(&elements).expect_err("mixed");
        assert_eq!(
            err,
            FunctionError::HeterogeneousCollection {
                index: 2,
                expected: Type::String,
                found: Type::Number,
            }
        );
    }
}
