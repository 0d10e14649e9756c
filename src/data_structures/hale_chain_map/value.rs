// Copyright (c) 2025 Hale Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Tagged primitive values stored as keys and values in the chain map.
//!
//! A [`TaggedValue`] is a closed union over the five kinds the table accepts.
//! Every hash, comparison and formatting site matches on it exhaustively, so
//! adding a kind is a compile error everywhere it needs handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{HaleChainMapError, Result};

/// The kind tag of a [`TaggedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// UTF-8 text
    String,
    /// 32-bit signed integer
    Integer,
    /// 64-bit floating point
    Double,
    /// 32-bit floating point
    Float,
    /// Single Unicode scalar value
    Char,
}

impl ValueKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [ValueKind; 5] = [
        ValueKind::String,
        ValueKind::Integer,
        ValueKind::Double,
        ValueKind::Float,
        ValueKind::Char,
    ];

    /// Human-readable name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "String",
            ValueKind::Integer => "Integer",
            ValueKind::Double => "Double",
            ValueKind::Float => "Float",
            ValueKind::Char => "Char",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = HaleChainMapError;

    fn from_str(s: &str) -> Result<Self> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                HaleChainMapError::Configuration(format!("unknown value kind: {s:?}"))
            })
    }
}

/// A primitive value annotated with its kind.
///
/// Equality is exact: two values are equal only when their kinds match and
/// the underlying values compare equal with `==`. Floating-point values are
/// never compared with a tolerance.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedValue {
    /// Text value
    String(String),
    /// Integer value
    Integer(i32),
    /// Double-precision value
    Double(f64),
    /// Single-precision value
    Float(f32),
    /// Character value
    Char(char),
}

impl TaggedValue {
    /// Parses `raw` into a value of the given kind.
    ///
    /// Numeric kinds ignore surrounding whitespace. Strings must be non-empty
    /// and are stored verbatim; characters must be exactly one scalar value.
    /// Floating-point input that parses to NaN is rejected, since NaN is not
    /// equal to itself and could never be found again once stored.
    ///
    /// # Errors
    ///
    /// Returns [`HaleChainMapError::InvalidConversion`] when `raw` is not a
    /// valid literal for `kind`. Parsing never partially succeeds.
    pub fn parse(raw: &str, kind: ValueKind) -> Result<Self> {
        let invalid = || HaleChainMapError::InvalidConversion {
            kind,
            input: raw.to_string(),
        };

        match kind {
            ValueKind::String => {
                if raw.is_empty() {
                    Err(invalid())
                } else {
                    Ok(TaggedValue::String(raw.to_string()))
                }
            }
            ValueKind::Integer => raw
                .trim()
                .parse::<i32>()
                .map(TaggedValue::Integer)
                .map_err(|_| invalid()),
            ValueKind::Double => match raw.trim().parse::<f64>() {
                Ok(v) if !v.is_nan() => Ok(TaggedValue::Double(v)),
                _ => Err(invalid()),
            },
            ValueKind::Float => match raw.trim().parse::<f32>() {
                Ok(v) if !v.is_nan() => Ok(TaggedValue::Float(v)),
                _ => Err(invalid()),
            },
            ValueKind::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(TaggedValue::Char(c)),
                    _ => Err(invalid()),
                }
            }
        }
    }

    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            TaggedValue::String(_) => ValueKind::String,
            TaggedValue::Integer(_) => ValueKind::Integer,
            TaggedValue::Double(_) => ValueKind::Double,
            TaggedValue::Float(_) => ValueKind::Float,
            TaggedValue::Char(_) => ValueKind::Char,
        }
    }

    /// Returns `true` if the value carries the given kind tag.
    pub fn is_kind(&self, kind: ValueKind) -> bool {
        self.kind() == kind
    }

    /// Returns `true` for a Double or Float holding NaN.
    pub fn is_nan(&self) -> bool {
        match self {
            TaggedValue::Double(d) => d.is_nan(),
            TaggedValue::Float(x) => x.is_nan(),
            TaggedValue::String(_) | TaggedValue::Integer(_) | TaggedValue::Char(_) => false,
        }
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggedValue::String(s) => f.write_str(s),
            TaggedValue::Integer(i) => write!(f, "{i}"),
            TaggedValue::Double(d) => write!(f, "{d:.2}"),
            TaggedValue::Float(x) => write!(f, "{x:.2}"),
            TaggedValue::Char(c) => write!(f, "{c}"),
        }
    }
}

impl From<&str> for TaggedValue {
    fn from(value: &str) -> Self {
        TaggedValue::String(value.to_string())
    }
}

impl From<String> for TaggedValue {
    fn from(value: String) -> Self {
        TaggedValue::String(value)
    }
}

impl From<i32> for TaggedValue {
    fn from(value: i32) -> Self {
        TaggedValue::Integer(value)
    }
}

impl From<f64> for TaggedValue {
    fn from(value: f64) -> Self {
        TaggedValue::Double(value)
    }
}

impl From<f32> for TaggedValue {
    fn from(value: f32) -> Self {
        TaggedValue::Float(value)
    }
}

impl From<char> for TaggedValue {
    fn from(value: char) -> Self {
        TaggedValue::Char(value)
    }
}
