//! Closed variants
//!
//! A variant holds exactly one value out of a fixed list of alternative
//! types, together with a discriminant naming which one. Variants are
//! native enums declared through [`variant!`](crate::variant!); the traits
//! here expose each alternative as a type so that the dispatch layer can
//! select handlers by the types they declare.
//!
//! Invariants:
//! - The discriminant is the declaration index of the live alternative
//! - A variant exclusively owns its alternative
//! - Replacing the alternative drops the previous value exactly once
//! - A replacement is fully constructed before the old value is dropped

mod errors;
mod macros;

pub use errors::{VariantError, VariantResult};

use crate::dispatch::{ConsumingSet, DispatchResult, Multivisitor};
use crate::observability::{self, Event, Severity};
use std::fmt;

/// Index of the live alternative, in declaration order.
pub type Discriminant = u8;

/// Upper bound on the number of alternatives of one variant.
pub const MAX_ALTERNATIVES: usize = Discriminant::MAX as usize;

/// A closed sum type.
///
/// Implemented by [`variant!`](crate::variant!). Hand-written impls must keep
/// `discriminant()` below `ALTERNATIVES.len()`; dispatch rejects values that
/// do not.
pub trait Variant: Sized + fmt::Display {
    /// Type name, for diagnostics.
    const NAME: &'static str;

    /// Alternative names in declaration order.
    const ALTERNATIVES: &'static [&'static str];

    /// Discriminant of the live alternative.
    fn discriminant(&self) -> Discriminant;

    /// Discriminant, validated against the declared alternatives.
    fn checked_discriminant(&self) -> VariantResult<Discriminant> {
        let discriminant = self.discriminant();
        if usize::from(discriminant) < Self::ALTERNATIVES.len() {
            Ok(discriminant)
        } else {
            Err(VariantError::InvalidDiscriminant {
                variant: Self::NAME,
                discriminant,
                alternatives: Self::ALTERNATIVES.len(),
            })
        }
    }

    /// Name of the live alternative.
    fn alternative_name(&self) -> VariantResult<&'static str> {
        let discriminant = self.checked_discriminant()?;
        Ok(Self::ALTERNATIVES[usize::from(discriminant)])
    }

    /// Whether `T` is the live alternative.
    fn holds<T: Alternative<Self>>(&self) -> bool {
        self.discriminant() == T::DISCRIMINANT
    }

    /// Borrow the live alternative as `T`, if it is one.
    fn get<T: Alternative<Self>>(&self) -> Option<&T> {
        T::project(self)
    }

    /// Mutably borrow the live alternative as `T`, if it is one.
    fn get_mut<T: Alternative<Self>>(&mut self) -> Option<&mut T> {
        T::project_mut(self)
    }

    /// Borrow the live alternative as `T`, or explain what is live instead.
    fn try_get<T: Alternative<Self>>(&self) -> VariantResult<&T> {
        match T::project(self) {
            Some(value) => Ok(value),
            None => Err(VariantError::AlternativeMismatch {
                variant: Self::NAME,
                requested: T::NAME,
                held: alternative_label::<Self>(self.discriminant()),
            }),
        }
    }

    /// Move the live alternative out as `T`, consuming the variant.
    ///
    /// Returns the untouched variant when `T` is not live.
    fn into_alternative<T: Alternative<Self>>(self) -> Result<T, Self> {
        T::take(self)
    }

    /// Replace the live alternative, dropping the previous one.
    ///
    /// Accepts any alternative or another variant of the same type.
    fn assign<T: Into<Self>>(&mut self, value: T) {
        let next = value.into();
        trace_assign(self, &next);
        *self = next;
    }

    /// Replace the live alternative and hand the previous one back.
    fn replace<T: Into<Self>>(&mut self, value: T) -> Self {
        let next = value.into();
        trace_assign(self, &next);
        std::mem::replace(self, next)
    }

    /// Build a replacement with `build`, then assign it.
    ///
    /// If `build` fails the variant keeps its current value.
    fn try_assign_with<T, E, F>(&mut self, build: F) -> Result<(), E>
    where
        T: Into<Self>,
        F: FnOnce() -> Result<T, E>,
    {
        let next = build()?;
        self.assign(next);
        Ok(())
    }

    /// Copy-assign from another variant.
    fn assign_from(&mut self, other: &Self)
    where
        Self: Clone,
    {
        let copy = other.duplicate();
        self.assign(copy);
    }

    /// Copy this variant: same discriminant, equal alternative.
    fn duplicate(&self) -> Self
    where
        Self: Clone,
    {
        if observability::enabled(Severity::Trace) {
            let discriminant = self.discriminant().to_string();
            observability::emit(
                Severity::Trace,
                Event::VariantCopy,
                &[
                    ("variant", Self::NAME),
                    ("alternative", alternative_label::<Self>(self.discriminant())),
                    ("discriminant", &discriminant),
                ],
            );
        }
        self.clone()
    }

    /// Invoke the handler matching the live alternative.
    fn visit<R>(&self, visitor: &Multivisitor<'_, (Self,), R>) -> DispatchResult<R> {
        visitor.dispatch((self,))
    }

    /// Move the live alternative into the handler matching it.
    fn visit_owned<R>(self, handlers: &ConsumingSet<'_, Self, R>) -> DispatchResult<R> {
        handlers.invoke(self)
    }
}

/// One alternative type of the variant `V`.
pub trait Alternative<V: Variant>: Sized + Into<V> {
    /// Discriminant `V` uses for this alternative.
    const DISCRIMINANT: Discriminant;

    /// Alternative name as declared in `V`.
    const NAME: &'static str;

    fn project(variant: &V) -> Option<&Self>;

    fn project_mut(variant: &mut V) -> Option<&mut Self>;

    /// Move out of `variant`, or give it back unchanged.
    fn take(variant: V) -> Result<Self, V>;
}

crate::variant! {
    /// A variant without alternatives.
    ///
    /// The type exists but has no values, so nothing can construct or
    /// visit it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Never {}
}

fn alternative_label<V: Variant>(discriminant: Discriminant) -> &'static str {
    V::ALTERNATIVES
        .get(usize::from(discriminant))
        .copied()
        .unwrap_or("<invalid>")
}

#[doc(hidden)]
pub fn trace_construct<V: Variant>(discriminant: Discriminant) {
    if observability::enabled(Severity::Trace) {
        let rendered = discriminant.to_string();
        observability::emit(
            Severity::Trace,
            Event::VariantConstruct,
            &[
                ("variant", V::NAME),
                ("alternative", alternative_label::<V>(discriminant)),
                ("discriminant", &rendered),
            ],
        );
    }
}

fn trace_assign<V: Variant>(current: &V, next: &V) {
    if observability::enabled(Severity::Trace) {
        observability::emit(
            Severity::Trace,
            Event::VariantAssign,
            &[
                ("variant", V::NAME),
                ("from", alternative_label::<V>(current.discriminant())),
                ("to", alternative_label::<V>(next.discriminant())),
            ],
        );
    }
}
