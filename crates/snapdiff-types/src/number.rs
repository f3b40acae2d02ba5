use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// A JSON number.
///
/// The original representation is kept so a document serializes back to the
/// same text (`5` stays `5`, `2.5` stays `2.5`), but equality is by numeric
/// value: `Number::from(5) == Number::from_f64(5.0)`.
#[derive(Clone)]
pub struct Number(serde_json::Number);

impl Number {
    /// Build a number from a float. Fails for NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self, TypeError> {
        serde_json::Number::from_f64(value)
            .map(Self)
            .ok_or(TypeError::NonFiniteNumber)
    }

    /// The value as a float (lossy for integers beyond 2^53).
    pub fn as_f64(&self) -> f64 {
        // Always `Some` without serde_json's arbitrary_precision feature.
        self.0.as_f64().unwrap_or_default()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.as_u64()
    }

    /// Returns `true` if the number was written with a fractional part or exponent.
    pub fn is_float(&self) -> bool {
        self.0.is_f64()
    }

    /// Borrow the underlying JSON number.
    pub fn as_json(&self) -> &serde_json::Number {
        &self.0
    }

    fn integer(&self) -> Option<i128> {
        self.0
            .as_i64()
            .map(i128::from)
            .or_else(|| self.0.as_u64().map(i128::from))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.integer(), other.integer()) {
            (Some(a), Some(b)) => a == b,
            (Some(int), None) => float_equals_integer(other.as_f64(), int),
            (None, Some(int)) => float_equals_integer(self.as_f64(), int),
            (None, None) => self.as_f64() == other.as_f64(),
        }
    }
}

/// Exact comparison: a float only equals an integer it represents exactly.
fn float_equals_integer(float: f64, int: i128) -> bool {
    let bound = 2f64.powi(127);
    float.is_finite()
        && float.fract() == 0.0
        && float >= -bound
        && float < bound
        && float as i128 == int
}

impl From<serde_json::Number> for Number {
    fn from(value: serde_json::Number) -> Self {
        Self(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self(value.into())
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({})", self.0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Number::deserialize(deserializer).map(Self)
    }
}
