//! `Rule` — one compiled route pattern.
//!
//! A rule answers three questions:
//!
//! - [`exact_match`](Rule::exact_match) — is this path the pattern,
//!   literally? (placeholder-free patterns only; no regex engine touched)
//! - [`captures`](Rule::captures) — does the anchored matcher accept this
//!   path, and what did each placeholder capture?
//! - [`make_path`](Rule::make_path) — rebuild a path from positional or
//!   named argument values

use crate::pattern::{normalize, CompiledPattern, TemplatePart};
use crate::{BuildError, PatternError};
use std::collections::HashMap;
use url::form_urlencoded;

/// One compiled route pattern, offering exact/pattern matching and reverse
/// path construction.
#[derive(Debug)]
pub struct Rule {
    pattern: CompiledPattern,
}

impl Rule {
    /// Compile `pattern` into a rule.
    ///
    /// # Errors
    ///
    /// See [`CompiledPattern::compile`].
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: CompiledPattern::compile(pattern)?,
        })
    }

    /// The normalized pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.pattern()
    }

    /// Placeholder names in declaration order.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        self.pattern.keywords()
    }

    /// `true` if the pattern declares at least one placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.pattern.has_placeholders()
    }

    /// Literal fast path: `true` iff the pattern has no placeholders and
    /// equals the normalized path. No regex engine invoked.
    #[must_use]
    pub fn exact_match(&self, path: &str) -> bool {
        !self.has_placeholders() && self.pattern() == normalize(path)
    }

    /// Run the anchored matcher against `path`.
    ///
    /// Returns the captured substrings keyed by placeholder name, or `None`
    /// if the whole path does not match. A placeholder-free rule never
    /// matches here; it is eligible for [`exact_match`](Self::exact_match)
    /// only. Capture values are returned as-is, with no decoding.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        if !self.has_placeholders() {
            return None;
        }
        let caps = self.pattern.matcher().captures(normalize(path))?;
        let mut values = HashMap::with_capacity(self.keywords().len());
        for keyword in self.keywords() {
            if let Some(m) = caps.name(keyword) {
                values.insert(keyword.clone(), m.as_str().to_owned());
            }
        }
        Some(values)
    }

    /// Construct a path from argument values.
    ///
    /// Either positional values (exactly one per declared keyword, consumed
    /// in declaration order) or named values, never both. Named keys that
    /// are not declared keywords are appended as a percent-encoded query
    /// string, in the order supplied. Substituted placeholder values are
    /// not encoded.
    ///
    /// # Errors
    ///
    /// [`BuildError::AmbiguousArguments`], [`BuildError::ArityMismatch`] or
    /// [`BuildError::MissingKeyword`].
    pub fn make_path(
        &self,
        positional: &[String],
        named: &[(String, String)],
    ) -> Result<String, BuildError> {
        if !positional.is_empty() && !named.is_empty() {
            return Err(BuildError::AmbiguousArguments);
        }
        if !positional.is_empty() {
            return self.fill_positional(positional);
        }
        self.fill_named(named)
    }

    fn fill_positional(&self, values: &[String]) -> Result<String, BuildError> {
        let expected = self.keywords().len();
        if values.len() != expected {
            return Err(BuildError::ArityMismatch {
                expected,
                given: values.len(),
            });
        }
        let mut path = String::new();
        for part in &self.pattern.template {
            match part {
                TemplatePart::Literal(text) => path.push_str(text),
                TemplatePart::Placeholder(index) => path.push_str(&values[*index]),
            }
        }
        Ok(path)
    }

    fn fill_named(&self, values: &[(String, String)]) -> Result<String, BuildError> {
        let mut path = String::new();
        for part in &self.pattern.template {
            match part {
                TemplatePart::Literal(text) => path.push_str(text),
                TemplatePart::Placeholder(index) => {
                    let keyword = &self.keywords()[*index];
                    let value = values
                        .iter()
                        .find(|(name, _)| name == keyword)
                        .map(|(_, value)| value)
                        .ok_or_else(|| BuildError::MissingKeyword {
                            name: keyword.clone(),
                        })?;
                    path.push_str(value);
                }
            }
        }

        // Undeclared keys become the query string, in caller order.
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut any_extra = false;
        for (name, value) in values {
            if !self.keywords().iter().any(|k| k == name) {
                query.append_pair(name, value);
                any_extra = true;
            }
        }
        if any_extra {
            path.push('?');
            path.push_str(&query.finish());
        }
        Ok(path)
    }
}
