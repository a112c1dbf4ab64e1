//! Overload sets
//!
//! An overload set is an ordered list of handlers, each declaring one
//! pattern per argument position. Given arguments, the first handler whose
//! every pattern accepts wins. Order is semantic: a wildcard placed before
//! a concrete handler hides it.
//!
//! Handlers are closures whose parameters are references to the pattern
//! targets. Parameter types must be written out, because the pattern tuple
//! alone does not determine them for the compiler:
//!
//! ```ignore
//! OverloadSet::<(State, Event), State>::new()
//!     .case::<(Off, TurnOn)>(|_: &Off, _: &TurnOn| State::from(Idle))
//!     .case::<(Off, Any)>(|_: &Off, _: &Event| State::from(Off));
//! ```

use std::marker::PhantomData;

use super::arguments::{describe_combination, Variants};
use super::errors::{DispatchError, DispatchResult};
use super::multivisitor::Multivisitor;
use super::pattern::Pattern;
use crate::observability::{self, Event, Severity};
use crate::variant::{Discriminant, Variant};

/// Upper bound on the number of combinations a multivisitor tabulates.
pub const MAX_COMBINATIONS: usize = 1 << 16;

/// A callable usable as one case of an overload set.
///
/// `Sig` is the tuple of patterns, one per variant in `Vs`. Implemented for
/// every `Fn(&P1::Target, .., &Pk::Target) -> R` with k from 1 to 4.
pub trait Handler<Vs: Variants, Sig, R> {
    /// Whether every position accepts the given discriminants.
    ///
    /// A position missing from the slice accepts nothing.
    fn accepts(discriminants: &[Discriminant]) -> bool;

    /// Pattern text, e.g. `(Off, _)`.
    fn signature() -> String;

    /// Bind every position and call, or `None` if some position rejects.
    fn try_call<'a>(&self, args: Vs::Refs<'a>) -> Option<R>
    where
        Vs: 'a;
}

macro_rules! impl_handler {
    ($(($V:ident, $P:ident, $v:ident, $idx:tt)),+) => {
        impl<$($V,)+ $($P,)+ R, F> Handler<($($V,)+), ($($P,)+), R> for F
        where
            $($V: Variant, $P: Pattern<$V>,)+
            F: Fn($(&<$P as Pattern<$V>>::Target),+) -> R,
        {
            fn accepts(discriminants: &[Discriminant]) -> bool {
                true $(&& discriminants
                    .get($idx)
                    .is_some_and(|&d| <$P as Pattern<$V>>::accepts(d)))+
            }

            fn signature() -> String {
                let parts: Vec<String> = vec![$(<$P as Pattern<$V>>::describe()),+];
                format!("({})", parts.join(", "))
            }

            fn try_call<'a>(&self, args: <($($V,)+) as Variants>::Refs<'a>) -> Option<R>
            where
                ($($V,)+): 'a,
            {
                let ($($v,)+) = args;
                $( let $v = <$P as Pattern<$V>>::bind($v)?; )+
                Some((self)($($v),+))
            }
        }
    };
}

impl_handler!((V1, P1, v1, 0));
impl_handler!((V1, P1, v1, 0), (V2, P2, v2, 1));
impl_handler!((V1, P1, v1, 0), (V2, P2, v2, 1), (V3, P3, v3, 2));
impl_handler!((V1, P1, v1, 0), (V2, P2, v2, 1), (V3, P3, v3, 2), (V4, P4, v4, 3));

/// Type-erased case, so one set can hold closures of different types.
pub(crate) trait Arm<Vs: Variants, R> {
    fn accepts(&self, discriminants: &[Discriminant]) -> bool;

    fn signature(&self) -> String;

    fn try_call<'a>(&self, args: Vs::Refs<'a>) -> Option<R>
    where
        Vs: 'a;
}

struct Case<Sig, F> {
    handler: F,
    _signature: PhantomData<fn() -> Sig>,
}

impl<Vs, Sig, R, F> Arm<Vs, R> for Case<Sig, F>
where
    Vs: Variants,
    F: Handler<Vs, Sig, R>,
{
    fn accepts(&self, discriminants: &[Discriminant]) -> bool {
        <F as Handler<Vs, Sig, R>>::accepts(discriminants)
    }

    fn signature(&self) -> String {
        <F as Handler<Vs, Sig, R>>::signature()
    }

    fn try_call<'a>(&self, args: Vs::Refs<'a>) -> Option<R>
    where
        Vs: 'a,
    {
        <F as Handler<Vs, Sig, R>>::try_call(&self.handler, args)
    }
}

/// Ordered composition of handlers over the variants `Vs`, producing `R`.
///
/// `'h` bounds whatever the handlers borrow.
pub struct OverloadSet<'h, Vs: Variants, R> {
    arms: Vec<Box<dyn Arm<Vs, R> + 'h>>,
}

impl<'h, Vs: Variants, R> Default for OverloadSet<'h, Vs, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h, Vs: Variants, R> OverloadSet<'h, Vs, R> {
    /// An empty set. It can be built, but matches nothing.
    pub fn new() -> Self {
        Self { arms: Vec::new() }
    }

    /// Append a case. Earlier cases take precedence.
    pub fn case<Sig: 'h>(mut self, handler: impl Handler<Vs, Sig, R> + 'h) -> Self {
        self.arms.push(Box::new(Case {
            handler,
            _signature: PhantomData,
        }));
        self
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    /// Pattern text of every case, in order.
    pub fn signatures(&self) -> Vec<String> {
        self.arms.iter().map(|arm| arm.signature()).collect()
    }

    /// Index of the first case accepting this combination of discriminants.
    ///
    /// `None` if the slice has the wrong length or names an alternative
    /// that does not exist.
    pub fn resolve(&self, discriminants: &[Discriminant]) -> Option<usize> {
        if discriminants.len() != Vs::ARITY {
            return None;
        }
        let in_range = Vs::positions()
            .iter()
            .zip(discriminants)
            .all(|((_, alternatives), &d)| usize::from(d) < alternatives.len());
        if !in_range {
            return None;
        }
        resolve(&self.arms, discriminants)
    }

    /// Call the first matching case, scanning in declaration order.
    ///
    /// No exhaustiveness check is involved; a combination nothing covers
    /// fails with [`DispatchError::Unmatched`].
    pub fn invoke<'a>(&self, args: Vs::Refs<'a>) -> DispatchResult<R>
    where
        Vs: 'a,
    {
        Vs::locate(args)?;
        for arm in &self.arms {
            if let Some(result) = arm.try_call(args) {
                return Ok(result);
            }
        }
        Err(DispatchError::unmatched(Vs::describe(args)))
    }

    /// Check that every combination of alternatives has a case and
    /// tabulate the winning case of each.
    ///
    /// Cases that never win are reported as `HANDLER_UNREACHABLE` but kept.
    pub fn build(self) -> DispatchResult<Multivisitor<'h, Vs, R>> {
        let positions = Vs::positions();
        let radices: Vec<usize> = positions.iter().map(|(_, alts)| alts.len()).collect();

        let combinations = radices
            .iter()
            .try_fold(1usize, |acc, &radix| acc.checked_mul(radix))
            .filter(|&count| count <= MAX_COMBINATIONS)
            .ok_or(DispatchError::TooManyCombinations {
                limit: MAX_COMBINATIONS,
            })?;

        let mut table = Vec::with_capacity(combinations);
        let mut wins = vec![0usize; self.arms.len()];
        let mut discriminants: Vec<Discriminant> = vec![0; radices.len()];

        for cell in 0..combinations {
            decode(cell, &radices, &mut discriminants);
            match resolve(&self.arms, &discriminants) {
                Some(arm) => {
                    wins[arm] += 1;
                    table.push(arm);
                }
                None => {
                    let combination = describe_combination(&positions, &discriminants);
                    observability::emit(
                        Severity::Error,
                        Event::DispatchFailed,
                        &[("combination", &combination), ("stage", "build")],
                    );
                    return Err(DispatchError::unmatched(combination));
                }
            }
        }

        for (index, &count) in wins.iter().enumerate() {
            if count == 0 && observability::enabled(Severity::Warn) {
                let rendered = index.to_string();
                let signature = self.arms[index].signature();
                observability::emit(
                    Severity::Warn,
                    Event::HandlerUnreachable,
                    &[("arm", &rendered), ("signature", &signature)],
                );
            }
        }

        if observability::enabled(Severity::Trace) {
            let arms = self.arms.len().to_string();
            let cells = combinations.to_string();
            observability::emit(
                Severity::Trace,
                Event::DispatchTableBuilt,
                &[("arms", &arms), ("combinations", &cells)],
            );
        }

        Ok(Multivisitor::new(self.arms, table.into_boxed_slice()))
    }
}

fn resolve<Vs: Variants, R>(
    arms: &[Box<dyn Arm<Vs, R> + '_>],
    discriminants: &[Discriminant],
) -> Option<usize> {
    arms.iter().position(|arm| arm.accepts(discriminants))
}

/// Inverse of `Variants::locate`: split a combination index into one
/// discriminant per position.
fn decode(mut cell: usize, radices: &[usize], out: &mut [Discriminant]) {
    for (slot, &radix) in out.iter_mut().zip(radices).rev() {
        *slot = (cell % radix) as Discriminant;
        cell /= radix;
    }
}

/// Build `handlers` and dispatch once.
///
/// Convenient for one-off calls; reuse a built [`Multivisitor`] otherwise.
pub fn multivisit<'h, 'a, Vs, R>(handlers: OverloadSet<'h, Vs, R>, args: Vs::Refs<'a>) -> DispatchResult<R>
where
    Vs: Variants + 'a,
{
    handlers.build()?.dispatch(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Any;
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    struct Word(String);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Number(i64);

    impl fmt::Display for Word {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "word{{{}}}", self.0)
        }
    }
    impl fmt::Display for Number {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "number{{{}}}", self.0)
        }
    }

    crate::variant! {
        #[derive(Debug, Clone, PartialEq)]
        enum Token {
            Word(Word),
            Number(Number),
        }
    }

    fn word(text: &str) -> Token {
        Token::from(Word(text.to_string()))
    }

    #[test]
    fn test_decode_inverts_locate() {
        let mut out = [0u8; 3];
        decode(5, &[2, 2, 2], &mut out);
        assert_eq!(out, [1, 0, 1]);

        decode(7, &[3, 5], &mut out[..2]);
        assert_eq!(&out[..2], &[1, 2]);
    }

    #[test]
    fn test_invoke_selects_by_alternative() {
        let set = OverloadSet::<(Token,), String>::new()
            .case::<(Word,)>(|w: &Word| format!("word of {}", w.0.len()))
            .case::<(Number,)>(|n: &Number| format!("number {}", n.0));

        assert_eq!(set.invoke((&word("abc"),)), Ok("word of 3".to_string()));
        assert_eq!(
            set.invoke((&Token::from(Number(9)),)),
            Ok("number 9".to_string())
        );
    }

    #[test]
    fn test_invoke_first_declared_wins() {
        let set = OverloadSet::<(Token,), &'static str>::new()
            .case::<(Word,)>(|_: &Word| "first")
            .case::<(Word,)>(|_: &Word| "second")
            .case::<(Any,)>(|_: &Token| "wildcard");

        assert_eq!(set.invoke((&word("x"),)), Ok("first"));
        assert_eq!(set.invoke((&Token::from(Number(1)),)), Ok("wildcard"));
        assert_eq!(set.resolve(&[0]), Some(0));
        assert_eq!(set.resolve(&[1]), Some(2));
    }

    #[test]
    fn test_resolve_rejects_wrong_arity() {
        let set = OverloadSet::<(Token, Token), ()>::new()
            .case::<(Any, Any)>(|_: &Token, _: &Token| ());

        assert_eq!(set.resolve(&[0, 1]), Some(0));
        assert_eq!(set.resolve(&[0]), None);
        assert_eq!(set.resolve(&[]), None);
        assert_eq!(set.resolve(&[0, 1, 0]), None);
    }

    #[test]
    fn test_resolve_rejects_unknown_alternative() {
        let set = OverloadSet::<(Token,), ()>::new().case::<(Any,)>(|_: &Token| ());

        assert_eq!(set.resolve(&[1]), Some(0));
        assert_eq!(set.resolve(&[2]), None);
    }

    #[test]
    fn test_handler_rejects_short_slice() {
        fn accepts<H: Handler<(Token, Token), (Any, Any), ()>>(_: &H, d: &[Discriminant]) -> bool {
            H::accepts(d)
        }
        let handler = |_: &Token, _: &Token| ();

        assert!(accepts(&handler, &[0, 0]));
        assert!(!accepts(&handler, &[0]));
    }

    #[test]
    fn test_empty_set_cannot_be_invoked() {
        let set = OverloadSet::<(Token,), ()>::new();
        assert!(set.is_empty());

        let err = set.invoke((&word("x"),)).unwrap_err();
        assert_eq!(err, DispatchError::unmatched("Token::Word"));
    }

    #[test]
    fn test_build_rejects_uncovered_combination() {
        let set = OverloadSet::<(Token, Token), ()>::new()
            .case::<(Word, Any)>(|_: &Word, _: &Token| ())
            .case::<(Number, Number)>(|_: &Number, _: &Number| ());

        match set.build() {
            Err(DispatchError::Unmatched { combination }) => {
                assert_eq!(combination, "Token::Number, Token::Word");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected the build to fail"),
        }
    }

    #[test]
    fn test_signatures_render_patterns() {
        let set = OverloadSet::<(Token, Token), ()>::new()
            .case::<(Word, Any)>(|_: &Word, _: &Token| ())
            .case::<(Any, Number)>(|_: &Token, _: &Number| ());

        assert_eq!(set.len(), 2);
        assert_eq!(set.signatures(), vec!["(Word, _)", "(_, Number)"]);
    }

    #[test]
    fn test_handlers_may_borrow() {
        let suffix = String::from("!");
        let set = OverloadSet::<(Token,), String>::new()
            .case::<(Word,)>(|w: &Word| format!("{}{}", w.0, suffix))
            .case::<(Number,)>(|n: &Number| format!("{}{}", n.0, suffix));

        assert_eq!(set.invoke((&word("hey"),)), Ok("hey!".to_string()));
    }

    #[test]
    fn test_multivisit_one_shot() {
        let handlers = OverloadSet::<(Token, Token), i64>::new()
            .case::<(Number, Number)>(|a: &Number, b: &Number| a.0 + b.0)
            .case::<(Any, Any)>(|_: &Token, _: &Token| -1);

        let two = Token::from(Number(2));
        let three = Token::from(Number(3));
        assert_eq!(multivisit(handlers, (&two, &three)), Ok(5));
    }
}
