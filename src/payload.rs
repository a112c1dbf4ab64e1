//! Text-or-numbers payload
//!
//! A two-alternative variant and the measures defined over it. The binary
//! measure is a 2x2 multivisitor, one handler per combination:
//!
//! | left    | right   | measure                               |
//! |---------|---------|---------------------------------------|
//! | text    | text    | sum of lengths                        |
//! | text    | numbers | text length + leading number          |
//! | numbers | text    | number count + leading byte of text   |
//! | numbers | numbers | sum of leading numbers                |
//!
//! A missing leading element counts as 0.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

use crate::dispatch::{DispatchResult, Multivisitor, OverloadSet};

/// An ordered list of integers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumberList(pub Vec<i32>);

impl NumberList {
    /// First element, or 0 for an empty list.
    pub fn leading(&self) -> i64 {
        self.0.first().copied().map(i64::from).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<i32>> for NumberList {
    fn from(values: Vec<i32>) -> Self {
        NumberList(values)
    }
}

impl fmt::Display for NumberList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

crate::variant! {
    /// Either a string or a list of numbers.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Payload {
        Text(String),
        Numbers(NumberList),
    }
}

/// Error parsing payload text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePayloadError {
    #[error("payload '{0}' must start with 'text:' or 'numbers:'")]
    UnknownKind(String),

    #[error("invalid number '{value}': {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

fn text_len(text: &str) -> i64 {
    i64::try_from(text.len()).unwrap_or(i64::MAX)
}

fn leading_byte(text: &str) -> i64 {
    text.as_bytes().first().copied().map(i64::from).unwrap_or(0)
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Payload::from(text)
    }

    pub fn numbers(values: Vec<i32>) -> Self {
        Payload::from(NumberList(values))
    }

    /// Unary measure: text length, or the leading number.
    pub fn measure(&self) -> DispatchResult<i64> {
        OverloadSet::<(Payload,), i64>::new()
            .case::<(String,)>(|text: &String| text_len(text))
            .case::<(NumberList,)>(|numbers: &NumberList| numbers.leading())
            .invoke((self,))
    }
}

/// The four binary measure handlers, in table order.
pub fn measure_table() -> OverloadSet<'static, (Payload, Payload), i64> {
    OverloadSet::new()
        .case::<(String, String)>(|a: &String, b: &String| text_len(a) + text_len(b))
        .case::<(String, NumberList)>(|a: &String, b: &NumberList| text_len(a) + b.leading())
        .case::<(NumberList, String)>(|a: &NumberList, b: &String| {
            i64::try_from(a.len()).unwrap_or(i64::MAX) + leading_byte(b)
        })
        .case::<(NumberList, NumberList)>(|a: &NumberList, b: &NumberList| {
            a.leading() + b.leading()
        })
}

pub fn measure_visitor() -> DispatchResult<Multivisitor<'static, (Payload, Payload), i64>> {
    measure_table().build()
}

/// Binary measure of two payloads.
pub fn combined_measure(left: &Payload, right: &Payload) -> DispatchResult<i64> {
    measure_visitor()?.dispatch((left, right))
}

impl FromStr for Payload {
    type Err = ParsePayloadError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Some(text) = input.strip_prefix("text:") {
            return Ok(Payload::text(text));
        }

        let list = input
            .strip_prefix("numbers:")
            .ok_or_else(|| ParsePayloadError::UnknownKind(input.to_string()))?;

        let values = list
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                value.parse::<i32>().map_err(|source| ParsePayloadError::InvalidNumber {
                    value: value.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Payload::numbers(values))
    }
}
