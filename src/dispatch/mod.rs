//! Type-directed dispatch over variants
//!
//! This module provides:
//! - Patterns: an alternative type, the `Any` wildcard, `OneOf` subsets
//! - Overload sets: ordered handler composition, first match wins
//! - Multivisitors: exhaustiveness-checked dispatch across several variants
//! - Consuming sets: handlers that take the live alternative by value
//!
//! # Resolution
//!
//! Handlers are tried in declaration order. The first one whose every
//! pattern accepts the live alternatives is called; later handlers that
//! would also match are never reached. Ambiguity is not an error.
//!
//! # Exhaustiveness
//!
//! [`OverloadSet::build`] enumerates every combination of alternatives and
//! fails if any is left without a handler. A built [`Multivisitor`] can
//! therefore only fail at dispatch on a corrupted discriminant.

mod arguments;
mod consuming;
mod errors;
mod multivisitor;
mod overload;
mod pattern;

pub use arguments::Variants;
pub use consuming::ConsumingSet;
pub use errors::{DispatchError, DispatchResult};
pub use multivisitor::Multivisitor;
pub use overload::{multivisit, Handler, OverloadSet, MAX_COMBINATIONS};
pub use pattern::{Any, OneOf, Pattern};
