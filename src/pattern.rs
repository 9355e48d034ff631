//! Pattern compiler — route-pattern string → matcher + reverse template.
//!
//! A pattern mixes literal text with placeholders written `<name>` or
//! `<kind:name>`, `kind ∈ {string, path}`. Compilation produces everything
//! the two routing directions need in one pass:
//!
//! - an anchored [`Regex`] for forward matching, with one named capture
//!   group per placeholder
//! - the ordered keyword list (order of first appearance, left to right),
//!   which positional reverse-construction substitutes against
//! - a reverse template of literal runs and placeholder slots
//!
//! Literal text is embedded in the matcher **without escaping**: a literal
//! `.` in a pattern participates in matching as a wildcard. Existing route
//! sets rely on this, so it is kept rather than fixed.

use crate::PatternError;
use regex::Regex;

/// What a placeholder is allowed to consume at match time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaceholderKind {
    /// One or more characters, excluding the path separator. The default,
    /// written `<name>` or `<string:name>`.
    Segment,
    /// Zero or more characters, path separators included. Written
    /// `<path:name>`.
    Greedy,
}

impl PlaceholderKind {
    /// The capture-group body this kind compiles to.
    fn matcher_fragment(self) -> &'static str {
        match self {
            // Non-greedy: a segment stops at the earliest point the rest of
            // the pattern can still match.
            Self::Segment => "[^/]+?",
            Self::Greedy => ".*",
        }
    }
}

/// One piece of the reverse template: literal text, or the slot for the
/// keyword at the given index.
#[derive(Debug, Clone)]
pub(crate) enum TemplatePart {
    Literal(String),
    Placeholder(usize),
}

/// A compiled route pattern.
///
/// Produced by [`CompiledPattern::compile`], owned by a [`Rule`](crate::Rule).
#[derive(Debug)]
pub struct CompiledPattern {
    raw: String,
    keywords: Vec<String>,
    regex: Regex,
    pub(crate) template: Vec<TemplatePart>,
}

impl CompiledPattern {
    /// Compile a pattern string.
    ///
    /// Trailing slashes are stripped first, so `/foo/` and `/foo` compile
    /// identically (and an empty or all-slash pattern becomes `/`).
    ///
    /// Malformed placeholder syntax is not validated: an unclosed `<`, a
    /// bracketed body that is not an identifier (`<123>`), or an unknown
    /// kind (`<int:x>`) all degrade to literal text.
    ///
    /// # Errors
    ///
    /// - [`PatternError::InvalidName`] — a `<string:…>`/`<path:…>`
    ///   placeholder whose name is not a simple identifier
    /// - [`PatternError::DuplicateName`] — a placeholder name repeated
    ///   within the pattern
    /// - [`PatternError::InvalidMatcher`] — unescaped literal text broke
    ///   the regex engine
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let raw = normalize(pattern).to_owned();

        let mut keywords: Vec<String> = Vec::new();
        let mut template: Vec<TemplatePart> = Vec::new();
        let mut matcher = String::from("^");
        let mut literal = String::new();

        let mut rest = raw.as_str();
        while let Some(open) = rest.find('<') {
            let (before, bracketed) = rest.split_at(open);
            literal.push_str(before);

            let Some(close) = bracketed.find('>') else {
                // Unclosed placeholder: the remainder is literal text.
                literal.push_str(bracketed);
                rest = "";
                break;
            };
            let body = &bracketed[1..close];
            rest = &bracketed[close + 1..];

            match parse_placeholder(body) {
                Some((kind, name)) => {
                    if !is_identifier(name) {
                        return Err(PatternError::InvalidName {
                            pattern: raw.clone(),
                            name: name.to_owned(),
                        });
                    }
                    if keywords.iter().any(|k| k == name) {
                        return Err(PatternError::DuplicateName {
                            pattern: raw.clone(),
                            name: name.to_owned(),
                        });
                    }
                    flush_literal(&mut literal, &mut template, &mut matcher);
                    matcher.push_str(&format!("(?P<{name}>{})", kind.matcher_fragment()));
                    template.push(TemplatePart::Placeholder(keywords.len()));
                    keywords.push(name.to_owned());
                }
                None => {
                    // Not a placeholder: keep the brackets as literal text.
                    literal.push_str(&bracketed[..close + 1]);
                }
            }
        }
        literal.push_str(rest);
        flush_literal(&mut literal, &mut template, &mut matcher);
        matcher.push('$');

        let regex = Regex::new(&matcher).map_err(|e| PatternError::InvalidMatcher {
            pattern: raw.clone(),
            source: e.to_string(),
        })?;

        Ok(Self {
            raw,
            keywords,
            regex,
            template,
        })
    }

    /// The normalized pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in declaration order.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// `true` if the pattern declares at least one placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// The anchored forward matcher.
    pub(crate) fn matcher(&self) -> &Regex {
        &self.regex
    }
}

/// Strip trailing slashes; an empty result is the root path.
///
/// Applied to patterns at compile time and to incoming paths before
/// matching, so `/foo/` and `/foo` are interchangeable on both sides.
pub(crate) fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Interpret a bracketed body as a placeholder, or `None` to degrade to
/// literal text.
///
/// An unknown kind prefix is literal; a known kind with a bad name is
/// reported by the caller as an error rather than silently demoted.
fn parse_placeholder(body: &str) -> Option<(PlaceholderKind, &str)> {
    match body.split_once(':') {
        Some(("string", name)) => Some((PlaceholderKind::Segment, name)),
        Some(("path", name)) => Some((PlaceholderKind::Greedy, name)),
        Some(_) => None,
        None if is_identifier(body) => Some((PlaceholderKind::Segment, body)),
        None => None,
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Move any pending literal run into both the matcher and the template.
///
/// Literal text goes into the matcher verbatim — deliberately unescaped.
fn flush_literal(literal: &mut String, template: &mut Vec<TemplatePart>, matcher: &mut String) {
    if literal.is_empty() {
        return;
    }
    matcher.push_str(literal);
    template.push(TemplatePart::Literal(std::mem::take(literal)));
}
