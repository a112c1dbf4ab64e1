//! Handler parameter patterns
//!
//! A pattern decides, from a discriminant alone, whether a handler
//! parameter accepts the live alternative, and borrows the value the
//! handler receives.

use std::marker::PhantomData;

use crate::variant::{Discriminant, Variant};

/// A handler parameter pattern over the variant `V`.
///
/// Every alternative type of a `variant!` enum is a pattern binding `&T`.
/// [`Any`] and [`OneOf`] bind the whole variant.
pub trait Pattern<V: Variant> {
    /// What the handler receives a reference to.
    type Target;

    /// Whether a value with this discriminant matches.
    fn accepts(discriminant: Discriminant) -> bool;

    /// Borrow the matched value, or `None` when the pattern does not match.
    fn bind(variant: &V) -> Option<&Self::Target>;

    /// Pattern text for diagnostics.
    fn describe() -> String;
}

/// Wildcard: matches every alternative and binds the whole variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Any;

impl<V: Variant> Pattern<V> for Any {
    type Target = V;

    fn accepts(_discriminant: Discriminant) -> bool {
        true
    }

    fn bind(variant: &V) -> Option<&V> {
        Some(variant)
    }

    fn describe() -> String {
        "_".to_string()
    }
}

/// Matches any of the listed alternatives and binds the whole variant.
///
/// `OneOf<(Idle, Turning)>` stands for "the controller is on".
pub struct OneOf<T>(PhantomData<T>);

macro_rules! impl_one_of {
    ($($P:ident),+) => {
        impl<V: Variant, $($P: Pattern<V>),+> Pattern<V> for OneOf<($($P,)+)> {
            type Target = V;

            fn accepts(discriminant: Discriminant) -> bool {
                false $(|| <$P as Pattern<V>>::accepts(discriminant))+
            }

            fn bind(variant: &V) -> Option<&V> {
                if <Self as Pattern<V>>::accepts(variant.discriminant()) {
                    Some(variant)
                } else {
                    None
                }
            }

            fn describe() -> String {
                let parts: Vec<String> = vec![$(<$P as Pattern<V>>::describe()),+];
                parts.join("|")
            }
        }
    };
}

impl_one_of!(A, B);
impl_one_of!(A, B, C);
impl_one_of!(A, B, C, D);
