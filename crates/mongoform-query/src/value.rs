//! Typed values produced from a rule's raw text.
//!
//! [`TypedValue`] is the closed set of shapes a converted value can take.
//! Numeric parse failures are kept as an invalid [`Numeric`] rather than an
//! error; the canonicalization pass later turns them into `null`.

use serde_json::{Map, Value};

/// A number read from form text, possibly invalid.
///
/// Integers and floats share one representation since the target document
/// language has a single number type. A failed parse is stored as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric(f64);

impl Numeric {
    /// The failed-parse sentinel.
    pub const INVALID: Numeric = Numeric(f64::NAN);

    pub fn new(value: f64) -> Self {
        Numeric(value)
    }

    /// Returns the raw `f64`, NaN or infinite included.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if the number survives a strict JSON encoding.
    pub fn is_valid(self) -> bool {
        self.0.is_finite()
    }

    /// Returns the number if it is valid.
    pub fn as_f64(self) -> Option<f64> {
        self.is_valid().then_some(self.0)
    }
}

impl From<f64> for Numeric {
    fn from(n: f64) -> Self {
        Numeric(n)
    }
}

impl From<i64> for Numeric {
    fn from(n: i64) -> Self {
        Numeric(n as f64)
    }
}

/// Value of a rule after type conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Text taken verbatim.
    Text(String),
    /// Integer or float, possibly the invalid sentinel.
    Number(Numeric),
    /// Parsed JSON array.
    Array(Vec<Value>),
    /// Parsed JSON object.
    Object(Map<String, Value>),
}

impl TypedValue {
    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, TypedValue::Text(_))
    }

    /// Returns `true` if this is a `Number` value, valid or not.
    pub fn is_number(&self) -> bool {
        matches!(self, TypedValue::Number(_))
    }

    /// Returns `true` if this is an `Array` value.
    pub fn is_array(&self) -> bool {
        matches!(self, TypedValue::Array(_))
    }

    /// Returns `true` if this is an `Object` value.
    pub fn is_object(&self) -> bool {
        matches!(self, TypedValue::Object(_))
    }

    /// Extracts the text, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number, if present.
    pub fn as_number(&self) -> Option<Numeric> {
        match self {
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            TypedValue::Text(_) => "text",
            TypedValue::Number(_) => "number",
            TypedValue::Array(_) => "array",
            TypedValue::Object(_) => "object",
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::Text(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::Text(s)
    }
}

impl From<Numeric> for TypedValue {
    fn from(n: Numeric) -> Self {
        TypedValue::Number(n)
    }
}

impl From<i64> for TypedValue {
    fn from(n: i64) -> Self {
        TypedValue::Number(Numeric::from(n))
    }
}

impl From<f64> for TypedValue {
    fn from(n: f64) -> Self {
        TypedValue::Number(Numeric::from(n))
    }
}
