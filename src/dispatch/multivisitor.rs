//! Multivisitors
//!
//! A multivisitor is an overload set that passed the exhaustiveness check,
//! together with the winning arm of every combination of alternatives.
//! Dispatch folds the arguments' discriminants into a combination index and
//! calls the tabulated arm; no arm is scanned at dispatch time.

use super::arguments::{describe_combination, Variants};
use super::errors::{DispatchError, DispatchResult};
use super::overload::Arm;
use crate::observability::{self, Event, Severity};
use crate::variant::Discriminant;

/// Exhaustive N-ary dispatcher over the variants `Vs`, producing `R`.
///
/// Built with [`OverloadSet::build`](super::OverloadSet::build). Stateless
/// between calls.
pub struct Multivisitor<'h, Vs: Variants, R> {
    arms: Vec<Box<dyn Arm<Vs, R> + 'h>>,
    table: Box<[usize]>,
}

impl<'h, Vs: Variants, R> Multivisitor<'h, Vs, R> {
    pub(crate) fn new(arms: Vec<Box<dyn Arm<Vs, R> + 'h>>, table: Box<[usize]>) -> Self {
        Self { arms, table }
    }

    /// Call the arm that wins the arguments' combination.
    ///
    /// Arguments are borrowed; dispatch never clones, moves or drops an
    /// alternative.
    pub fn dispatch<'a>(&self, args: Vs::Refs<'a>) -> DispatchResult<R>
    where
        Vs: 'a,
    {
        let cell = match Vs::locate(args) {
            Ok(cell) => cell,
            Err(err) => {
                let reason = err.to_string();
                observability::emit(
                    Severity::Error,
                    Event::DispatchFailed,
                    &[("reason", &reason), ("stage", "dispatch")],
                );
                return Err(err);
            }
        };

        // A built table covers every combination, so a miss here means the
        // arguments and the table disagree on the alternative lists.
        let arm = match self.table.get(cell).and_then(|&index| self.arms.get(index)) {
            Some(arm) => arm,
            None => return Err(DispatchError::unmatched(Vs::describe(args))),
        };

        if observability::enabled(Severity::Trace) {
            let combination = Vs::describe(args);
            let index = self.table[cell].to_string();
            let signature = arm.signature();
            observability::emit(
                Severity::Trace,
                Event::DispatchResolved,
                &[
                    ("arm", &index),
                    ("combination", &combination),
                    ("signature", &signature),
                ],
            );
        }

        arm.try_call(args)
            .ok_or_else(|| DispatchError::unmatched(Vs::describe(args)))
    }

    /// Number of arms, including unreachable ones.
    pub fn arms(&self) -> usize {
        self.arms.len()
    }

    /// Number of tabulated combinations.
    pub fn combinations(&self) -> usize {
        self.table.len()
    }

    /// Index of the arm that wins the given discriminants.
    ///
    /// `None` if the slice has the wrong length or names an alternative
    /// that does not exist.
    pub fn winner(&self, discriminants: &[Discriminant]) -> Option<usize> {
        let positions = Vs::positions();
        if discriminants.len() != positions.len() {
            return None;
        }
        let mut cell = 0usize;
        for ((_, alternatives), &d) in positions.iter().zip(discriminants) {
            if usize::from(d) >= alternatives.len() {
                return None;
            }
            cell = cell * alternatives.len() + usize::from(d);
        }
        self.table.get(cell).copied()
    }

    /// Pattern text of every arm, in declaration order.
    pub fn signatures(&self) -> Vec<String> {
        self.arms.iter().map(|arm| arm.signature()).collect()
    }

    /// Every combination with the signature of the arm that wins it.
    pub fn resolutions(&self) -> Vec<(String, String)> {
        let positions = Vs::positions();
        let radices: Vec<usize> = positions.iter().map(|(_, alts)| alts.len()).collect();
        let mut discriminants: Vec<Discriminant> = vec![0; radices.len()];

        self.table
            .iter()
            .enumerate()
            .map(|(cell, &arm)| {
                let mut rest = cell;
                for (slot, &radix) in discriminants.iter_mut().zip(&radices).rev() {
                    *slot = (rest % radix) as Discriminant;
                    rest /= radix;
                }
                (
                    describe_combination(&positions, &discriminants),
                    self.arms[arm].signature(),
                )
            })
            .collect()
    }
}
