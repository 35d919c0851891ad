//! The value model shared by the reader and writer.
//!
//! [`Value`] is a closed tagged union over the six JSON value kinds. The
//! container kinds are empty markers: a reader handler is told that an array
//! or object *starts* and chooses whether to descend; no tree is ever built.
//!
//! Typed accessors assert the active tag. A mismatched access is a contract
//! violation by the caller, so it panics rather than coercing or returning an
//! error.

use alloc::borrow::Cow;

/// A parsed JSON number.
///
/// The conversion to `f64` loses precision beyond 2^53. [`Number::raw`]
/// exposes the untouched lexeme, always a zero-copy slice of the input
/// buffer, for callers that need big integers or exact decimal forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number<'a> {
    value: f64,
    raw: &'a str,
}

impl<'a> Number<'a> {
    pub(crate) fn new(value: f64, raw: &'a str) -> Self {
        Self { value, raw }
    }

    /// The number converted to double precision.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.value
    }

    /// The unconverted lexeme as it appeared in the input.
    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }
}

/// A single JSON value reported to a parse handler.
///
/// Exactly one variant is ever active. [`Array`](Value::Array) and
/// [`Object`](Value::Object) carry no payload; they announce a nested
/// container whose body the handler may consume or skip.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// A number, converted to `f64` with the raw lexeme attached.
    Number(Number<'a>),
    /// A string; borrowed from the input unless escapes forced a copy.
    String(Cow<'a, str>),
    /// `true` or `false`.
    Boolean(bool),
    /// Marker for a nested array.
    Array,
    /// Marker for a nested object.
    Object,
    /// The `null` literal.
    Null,
}

impl<'a> Value<'a> {
    /// Returns `true` if the value is a number.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is a string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is a boolean.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value marks a nested array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array)
    }

    /// Returns `true` if the value marks a nested object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object)
    }

    /// Returns `true` if the value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The number as a double.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a number.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => n.get(),
            other => panic!("as_number called on {other:?}"),
        }
    }

    /// The raw numeric lexeme, for callers that must not go through `f64`.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a number.
    #[must_use]
    pub fn as_raw_number(&self) -> &'a str {
        match self {
            Self::Number(n) => n.raw(),
            other => panic!("as_raw_number called on {other:?}"),
        }
    }

    /// The string contents, regardless of whether they are borrowed from the
    /// input or were materialized by escape processing.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String(s) => s.as_ref(),
            other => panic!("as_str called on {other:?}"),
        }
    }

    /// The boolean value.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a boolean.
    #[must_use]
    pub fn as_boolean(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            other => panic!("as_boolean called on {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::borrow::Cow;

    use super::{Number, Value};

    #[test]
    fn accessors_match_active_tag() {
        assert_eq!(Value::Number(Number::new(1.5, "1.5")).as_number(), 1.5);
        assert_eq!(Value::Number(Number::new(1.5, "1.5")).as_raw_number(), "1.5");
        assert_eq!(Value::String(Cow::Borrowed("hi")).as_str(), "hi");
        assert!(Value::Boolean(true).as_boolean());
        assert!(Value::Null.is_null());
        assert!(Value::Array.is_array());
        assert!(Value::Object.is_object());
    }

    #[test]
    #[should_panic(expected = "as_number called on")]
    fn number_accessor_panics_on_string() {
        let _ = Value::String(Cow::Borrowed("nope")).as_number();
    }

    #[test]
    #[should_panic(expected = "as_str called on")]
    fn string_accessor_panics_on_null() {
        let _ = Value::Null.as_str();
    }

    #[test]
    fn raw_lexeme_survives_double_rounding() {
        let n = Number::new(9_007_199_254_740_993_f64, "9007199254740993");
        // 2^53 + 1 is not representable; the lexeme still is.
        assert_eq!(n.raw(), "9007199254740993");
        assert_eq!(n.get(), 9_007_199_254_740_992_f64);
    }
}
