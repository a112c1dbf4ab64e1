//! Dispatch error types

use thiserror::Error;

use crate::variant::VariantError;

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Dispatch errors
///
/// All of them are logic errors in the handler set or in a variant impl;
/// none is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no handler matches ({combination})")]
    Unmatched { combination: String },

    #[error(transparent)]
    Variant(#[from] VariantError),

    #[error("dispatch table would exceed {limit} combinations")]
    TooManyCombinations { limit: usize },
}

impl DispatchError {
    pub(crate) fn unmatched(combination: impl Into<String>) -> Self {
        DispatchError::Unmatched {
            combination: combination.into(),
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Unmatched { .. } => "unmatched",
            DispatchError::Variant(VariantError::InvalidDiscriminant { .. }) => {
                "invalid_discriminant"
            }
            DispatchError::Variant(VariantError::AlternativeMismatch { .. }) => {
                "alternative_mismatch"
            }
            DispatchError::TooManyCombinations { .. } => "too_many_combinations",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_display() {
        let err = DispatchError::unmatched("State::Off, Event::Reset");
        assert_eq!(err.to_string(), "no handler matches (State::Off, Event::Reset)");
        assert_eq!(err.kind(), "unmatched");
    }

    #[test]
    fn test_variant_error_is_transparent() {
        let err: DispatchError = VariantError::InvalidDiscriminant {
            variant: "State",
            discriminant: 4,
            alternatives: 3,
        }
        .into();
        assert!(err.to_string().starts_with("variant tag invalid"));
        assert_eq!(err.kind(), "invalid_discriminant");
    }
}
