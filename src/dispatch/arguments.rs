//! Tuples of variants as dispatch arguments
//!
//! A dispatch over K variants takes a K-tuple of references. Each position
//! is visited left to right: its discriminant is validated and folded into
//! a mixed-radix combination index, position 0 most significant.

use super::errors::DispatchResult;
use crate::variant::{Discriminant, Variant};

/// A tuple of variant types that can be dispatched on together.
///
/// Implemented for tuples of one to four variants.
pub trait Variants: Sized {
    /// The borrowed argument tuple handed to dispatch.
    type Refs<'a>: Copy
    where
        Self: 'a;

    /// Number of positions.
    const ARITY: usize;

    /// Variant name and alternative names of every position.
    fn positions() -> Vec<(&'static str, &'static [&'static str])>;

    /// Index of the combination the arguments form.
    ///
    /// Fails on the first position whose discriminant names no alternative.
    fn locate<'a>(refs: Self::Refs<'a>) -> DispatchResult<usize>
    where
        Self: 'a;

    /// `Variant::Alternative` text of every position.
    fn describe<'a>(refs: Self::Refs<'a>) -> String
    where
        Self: 'a;
}

/// Render a combination of discriminants as `Variant::Alternative, ...`.
pub(crate) fn describe_combination(
    positions: &[(&'static str, &'static [&'static str])],
    discriminants: &[Discriminant],
) -> String {
    positions
        .iter()
        .zip(discriminants)
        .map(|((name, alternatives), &d)| {
            let alternative = alternatives
                .get(usize::from(d))
                .copied()
                .unwrap_or("<invalid>");
            format!("{}::{}", name, alternative)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

macro_rules! impl_variants {
    ($arity:expr; $(($V:ident, $v:ident)),+) => {
        impl<$($V: Variant),+> Variants for ($($V,)+) {
            type Refs<'a> = ($(&'a $V,)+) where Self: 'a;

            const ARITY: usize = $arity;

            fn positions() -> Vec<(&'static str, &'static [&'static str])> {
                vec![$(($V::NAME, $V::ALTERNATIVES)),+]
            }

            fn locate<'a>(refs: Self::Refs<'a>) -> DispatchResult<usize>
            where
                Self: 'a,
            {
                let ($($v,)+) = refs;
                let mut cell = 0usize;
                $(
                    let discriminant = $v.checked_discriminant()?;
                    cell = cell * $V::ALTERNATIVES.len() + usize::from(discriminant);
                )+
                Ok(cell)
            }

            fn describe<'a>(refs: Self::Refs<'a>) -> String
            where
                Self: 'a,
            {
                let ($($v,)+) = refs;
                let discriminants = [$($v.discriminant()),+];
                describe_combination(&Self::positions(), &discriminants)
            }
        }
    };
}

impl_variants!(1; (V1, v1));
impl_variants!(2; (V1, v1), (V2, v2));
impl_variants!(3; (V1, v1), (V2, v2), (V3, v3));
impl_variants!(4; (V1, v1), (V2, v2), (V3, v3), (V4, v4));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchError;
    use crate::variant::VariantError;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Low;
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct High;

    impl fmt::Display for Low {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "low")
        }
    }
    impl fmt::Display for High {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "high")
        }
    }

    crate::variant! {
        #[derive(Debug, Clone, PartialEq)]
        enum Level {
            Low(Low),
            High(High),
        }
    }

    struct Stray;

    impl fmt::Display for Stray {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stray")
        }
    }

    impl Variant for Stray {
        const NAME: &'static str = "Stray";
        const ALTERNATIVES: &'static [&'static str] = &["A", "B", "C"];

        fn discriminant(&self) -> Discriminant {
            3
        }
    }

    #[test]
    fn test_locate_is_mixed_radix() {
        let low = Level::from(Low);
        let high = Level::from(High);

        assert_eq!(<(Level, Level)>::locate((&low, &low)), Ok(0));
        assert_eq!(<(Level, Level)>::locate((&low, &high)), Ok(1));
        assert_eq!(<(Level, Level)>::locate((&high, &low)), Ok(2));
        assert_eq!(<(Level, Level)>::locate((&high, &high)), Ok(3));
        assert_eq!(<(Level, Level, Level)>::locate((&high, &low, &high)), Ok(5));
    }

    #[test]
    fn test_locate_rejects_invalid_discriminant() {
        let low = Level::from(Low);
        let err = <(Level, Stray)>::locate((&low, &Stray)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Variant(VariantError::InvalidDiscriminant {
                variant: "Stray",
                discriminant: 3,
                alternatives: 3,
            })
        );
    }

    #[test]
    fn test_describe_names_each_position() {
        let low = Level::from(Low);
        let high = Level::from(High);
        assert_eq!(
            <(Level, Level)>::describe((&high, &low)),
            "Level::High, Level::Low"
        );
        assert_eq!(<(Level, Stray)>::describe((&low, &Stray)), "Level::Low, Stray::<invalid>");
    }

    #[test]
    fn test_positions_and_arity() {
        assert_eq!(<(Level,)>::ARITY, 1);
        assert_eq!(<(Level, Level, Level, Level)>::ARITY, 4);
        assert_eq!(
            <(Level, Stray)>::positions(),
            vec![
                ("Level", &["Low", "High"][..]),
                ("Stray", &["A", "B", "C"][..]),
            ]
        );
    }
}
