//! Consuming dispatch
//!
//! A consuming set hands the live alternative to its handler by value.
//! Cases are tried in declaration order; a case that does not take the
//! live alternative hands the variant back and the next case is offered
//! it, so nothing is cloned along the way.

use super::errors::{DispatchError, DispatchResult};
use crate::variant::{Alternative, Variant};

type OwnedArm<'h, V, R> = Box<dyn Fn(V) -> Result<R, V> + 'h>;

/// Ordered handlers that take the alternatives of `V` by value.
pub struct ConsumingSet<'h, V: Variant, R> {
    arms: Vec<OwnedArm<'h, V, R>>,
}

impl<'h, V: Variant, R> Default for ConsumingSet<'h, V, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h, V: Variant, R> ConsumingSet<'h, V, R> {
    pub fn new() -> Self {
        Self { arms: Vec::new() }
    }

    /// Append a case taking the alternative `T`. Earlier cases take
    /// precedence.
    pub fn case<T>(mut self, handler: impl Fn(T) -> R + 'h) -> Self
    where
        T: Alternative<V> + 'h,
        V: 'h,
        R: 'h,
    {
        self.arms
            .push(Box::new(move |variant: V| T::take(variant).map(&handler)));
        self
    }

    /// Append a case taking the whole variant, whatever it holds.
    pub fn otherwise(mut self, handler: impl Fn(V) -> R + 'h) -> Self
    where
        V: 'h,
        R: 'h,
    {
        self.arms.push(Box::new(move |variant: V| Ok(handler(variant))));
        self
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    /// Move `variant` into the first case that takes its alternative.
    pub fn invoke(&self, variant: V) -> DispatchResult<R> {
        variant.checked_discriminant()?;

        let mut variant = variant;
        for arm in &self.arms {
            match arm(variant) {
                Ok(result) => return Ok(result),
                Err(rejected) => variant = rejected,
            }
        }

        let alternative = variant.alternative_name()?;
        Err(DispatchError::unmatched(format!("{}::{}", V::NAME, alternative)))
    }
}
