//! Argument coercion — best-effort string → scalar conversion.
//!
//! Applied to placeholder captures when the router was built with
//! `convert_args(true)`. Never applied to the query mapping, and never on
//! exact-match dispatches (no captures exist there).
//!
//! The classification boundary is intentionally narrow and preserved from
//! the behavior existing routes depend on: the integer path accepts only
//! unsigned all-digit strings, so `-3` classifies as a float and `007`
//! parses as `7`.

/// Outcome of [`try_convert`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Coerced {
    /// Every character was an ASCII decimal digit.
    Integer(i64),
    /// Parsed as a floating-point number (signs, exponents, `inf`, `nan`).
    Float(f64),
    /// Case-insensitive `"true"` or `"false"`.
    Boolean(bool),
    /// No coercion applied; the capture value untouched.
    Unchanged(String),
}

impl Coerced {
    /// The uncoerced string, if no conversion applied.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Unchanged(s) => Some(s),
            _ => None,
        }
    }

    /// The integer value, if the integer path applied.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The float value, if the float path applied.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The boolean value, if the boolean path applied.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Coerced {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Unchanged(s) => write!(f, "{s}"),
        }
    }
}

/// Classify `value` into one of four outcomes, in fixed order.
///
/// 1. non-empty, all ASCII decimal digits → [`Coerced::Integer`] (no sign
///    handling; values that overflow `i64` fall through to the float path)
/// 2. else parseable as `f64` → [`Coerced::Float`]
/// 3. else case-insensitive `"true"`/`"false"` → [`Coerced::Boolean`]
/// 4. else → [`Coerced::Unchanged`]
///
/// # Example
///
/// ```
/// use routing::{try_convert, Coerced};
///
/// assert_eq!(try_convert("12"), Coerced::Integer(12));
/// assert_eq!(try_convert("12.5"), Coerced::Float(12.5));
/// assert_eq!(try_convert("true"), Coerced::Boolean(true));
/// assert_eq!(try_convert("abc"), Coerced::Unchanged("abc".into()));
/// ```
#[must_use]
pub fn try_convert(value: &str) -> Coerced {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse::<i64>() {
            return Coerced::Integer(n);
        }
    }
    if let Ok(x) = value.parse::<f64>() {
        return Coerced::Float(x);
    }
    if value.eq_ignore_ascii_case("true") {
        return Coerced::Boolean(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Coerced::Boolean(false);
    }
    Coerced::Unchanged(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_become_integer() {
        assert_eq!(try_convert("12"), Coerced::Integer(12));
        assert_eq!(try_convert("0"), Coerced::Integer(0));
        assert_eq!(try_convert("007"), Coerced::Integer(7));
    }

    #[test]
    fn signed_values_take_the_float_path() {
        // Leading '-' disqualifies the integer path by design.
        assert_eq!(try_convert("-3"), Coerced::Float(-3.0));
        assert_eq!(try_convert("+3"), Coerced::Float(3.0));
    }

    #[test]
    fn decimal_and_exponent_become_float() {
        assert_eq!(try_convert("12.5"), Coerced::Float(12.5));
        assert_eq!(try_convert("16.4"), Coerced::Float(16.4));
        assert_eq!(try_convert("1e3"), Coerced::Float(1000.0));
    }

    #[test]
    fn booleans_case_insensitive() {
        assert_eq!(try_convert("true"), Coerced::Boolean(true));
        assert_eq!(try_convert("False"), Coerced::Boolean(false));
        assert_eq!(try_convert("TRUE"), Coerced::Boolean(true));
    }

    #[test]
    fn everything_else_unchanged() {
        assert_eq!(try_convert("abc"), Coerced::Unchanged("abc".into()));
        assert_eq!(try_convert("12x"), Coerced::Unchanged("12x".into()));
        assert_eq!(try_convert(""), Coerced::Unchanged(String::new()));
    }

    #[test]
    fn digit_string_overflowing_i64_falls_through_to_float() {
        let v = "99999999999999999999999999";
        assert!(matches!(try_convert(v), Coerced::Float(_)));
    }

    #[test]
    fn float_path_runs_before_boolean() {
        // "inf" and "nan" parse as floats, same as the order of checks.
        assert_eq!(try_convert("inf"), Coerced::Float(f64::INFINITY));
        assert!(matches!(try_convert("nan"), Coerced::Float(x) if x.is_nan()));
    }
}
