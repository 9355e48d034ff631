//! `RouteArgs` — arguments for reverse routing.
//!
//! Mirrors the call shapes of [`Rule::make_path`](crate::Rule::make_path):
//! positional values consumed in keyword-declaration order, or named values
//! substituted by keyword (with undeclared names spilling into the query
//! string). Carried inside
//! [`RoutingError::NoBuildableRoute`](crate::RoutingError::NoBuildableRoute)
//! so failed reverse lookups report exactly what was asked for.

use std::fmt;

/// Positional and/or named argument values for [`Router::url_for`](crate::Router::url_for).
///
/// Values are stringified on insertion; placeholder substitution and query
/// encoding operate on strings only.
///
/// # Example
///
/// ```
/// use routing::RouteArgs;
///
/// let args = RouteArgs::new().kwarg("id", 42).kwarg("page", 2);
/// assert_eq!(args.to_string(), "(id=42, page=2)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteArgs {
    positional: Vec<String>,
    named: Vec<(String, String)>,
}

impl RouteArgs {
    /// Create an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value.
    #[must_use]
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// Append a named value. Order is preserved and significant for query
    /// string construction.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.named.push((name.into(), value.to_string()));
        self
    }

    /// The positional values, in insertion order.
    #[must_use]
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// The named values, in insertion order.
    #[must_use]
    pub fn named(&self) -> &[(String, String)] {
        &self.named
    }

    /// `true` if no values of either kind were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

impl fmt::Display for RouteArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        let mut first = true;
        for value in &self.positional {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
            first = false;
        }
        for (name, value) in &self.named {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_stringified() {
        let args = RouteArgs::new().arg(1).arg(2.6).arg(true).arg("baz");
        assert_eq!(args.positional(), ["1", "2.6", "true", "baz"]);
    }

    #[test]
    fn named_order_preserved() {
        let args = RouteArgs::new().kwarg("z", 1).kwarg("a", 2);
        assert_eq!(
            args.named(),
            [("z".to_string(), "1".to_string()), ("a".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(RouteArgs::new().to_string(), "()");
        assert_eq!(RouteArgs::new().arg(1).arg(2).to_string(), "(1, 2)");
        assert_eq!(
            RouteArgs::new().arg(1).kwarg("extra", "b").to_string(),
            "(1, extra=b)"
        );
    }
}
