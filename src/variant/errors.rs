//! Variant error types
//!
//! Both kinds are logic errors: they are only reachable through a broken
//! hand-written `Variant` impl or a caller asking for the wrong alternative.

use thiserror::Error;

use super::Discriminant;

/// Result type for variant operations
pub type VariantResult<T> = Result<T, VariantError>;

/// Variant errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
    #[error("variant tag invalid: {variant} has no alternative {discriminant} ({alternatives} declared)")]
    InvalidDiscriminant {
        variant: &'static str,
        discriminant: Discriminant,
        alternatives: usize,
    },

    #[error("{variant} holds {held}, not {requested}")]
    AlternativeMismatch {
        variant: &'static str,
        requested: &'static str,
        held: &'static str,
    },
}

impl VariantError {
    /// The discriminant that caused the error, if any.
    pub fn discriminant(&self) -> Option<Discriminant> {
        match self {
            VariantError::InvalidDiscriminant { discriminant, .. } => Some(*discriminant),
            VariantError::AlternativeMismatch { .. } => None,
        }
    }
}
