//! helmsman - closed variants and type-directed multi-dispatch
//!
//! - `variant`: closed sum types declared with [`variant!`]
//! - `dispatch`: overload sets and exhaustive multivisitors
//! - `helm`: a heading controller driven by a two-variant dispatch table
//! - `payload`: a text-or-numbers variant with a binary measure
//! - `observability`: structured logging through a per-thread sink

pub mod cli;
pub mod dispatch;
pub mod helm;
pub mod observability;
pub mod payload;
pub mod variant;
