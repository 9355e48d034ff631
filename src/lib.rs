//! routing - path-pattern router with reverse URL generation
//!
//! A router for plugin-style hosts that hand the process a single invocation
//! URL per lifetime. Route patterns are compiled once at registration time;
//! forward resolution maps a path to a handler plus extracted arguments, and
//! reverse resolution maps a handler plus arguments back to a URL.
//!
//! # Architecture
//!
//! - [`CompiledPattern`] — Pattern compiler: pattern string → anchored matcher
//!   + ordered keywords + reverse template
//! - [`Rule`] — One compiled pattern: exact-match fast path, capture match,
//!   reverse path construction
//! - [`Router`] — Ordered route table with two-pass forward resolution
//!   (exact pass, then pattern pass) and first-buildable-wins reverse
//!   resolution
//! - [`Coerced`] / [`try_convert`] — Optional best-effort coercion of
//!   captured placeholder values
//!
//! # Key Semantics
//!
//! 1. **Exact beats pattern**: forward resolution scans the whole table for
//!    an exact literal match before trying any placeholder pattern,
//!    regardless of registration order between the two kinds.
//!
//! 2. **Registration order is load-bearing**: within each pass, the first
//!    matching rule wins, in the order routes were added.
//!
//! 3. **Frozen table**: routes are registered on [`RouterBuilder`];
//!    [`RouterBuilder::build`] freezes the table, so a [`Router`] can never
//!    observe a half-registered state.
//!
//! # Example
//!
//! ```
//! use routing::{RouteArgs, Router};
//!
//! let mut builder = Router::builder().base_url("plugin://my.plugin");
//! let index = builder.handler("index", |_router, _inv| "index".to_string());
//! let show = builder.handler("show", |_router, inv| {
//!     format!("show {}", inv.arg("id").unwrap())
//! });
//! builder.route(index, "/").unwrap();
//! builder.route(show, "/show/<id>").unwrap();
//! let router = builder.build();
//!
//! // Reverse routing: handler + arguments → URL.
//! let url = router.url_for(show, &RouteArgs::new().kwarg("id", 42)).unwrap();
//! assert_eq!(url, "plugin://my.plugin/show/42");
//!
//! // Forward routing: path → handler invocation.
//! let out = router.dispatch("/show/42", Default::default()).unwrap();
//! assert_eq!(out, "show 42");
//! ```
//!
//! # Pattern Mini-Language
//!
//! - `<name>` or `<string:name>` — matches one or more non-`/` characters
//! - `<path:name>` — matches zero or more characters, `/` included
//! - everything else is literal text, embedded in the matcher **unescaped**
//!   (a literal `.` behaves as a wildcard; see [`PatternError::InvalidMatcher`])

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod args;
mod convert;
mod invocation;
mod pattern;
mod rule;
mod router;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use args::RouteArgs;
pub use convert::{try_convert, Coerced};
pub use invocation::{parse_query, Invocation, QueryMap};
pub use pattern::{CompiledPattern, PlaceholderKind};
pub use router::{Handler, HandlerId, Router, RouterBuilder};
pub use rule::Rule;

/// Prelude module for convenient imports.
///
/// ```
/// use routing::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        parse_query,
        try_convert,
        BuildError,
        Coerced,
        CompiledPattern,
        Handler,
        HandlerId,
        Invocation,
        PatternError,
        PlaceholderKind,
        QueryMap,
        RouteArgs,
        Router,
        RouterBuilder,
        RoutingError,
        Rule,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from pattern compilation.
///
/// These are caught at registration time, not at dispatch time. Fix the
/// route pattern and re-register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A placeholder uses a known kind but its name is not a simple
    /// identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    InvalidName {
        /// The offending pattern.
        pattern: String,
        /// The rejected placeholder name.
        name: String,
    },
    /// The same placeholder name appears more than once in one pattern.
    DuplicateName {
        /// The offending pattern.
        pattern: String,
        /// The repeated placeholder name.
        name: String,
    },
    /// The assembled matcher was rejected by the regex engine.
    ///
    /// Literal pattern text is embedded in the matcher without escaping, so
    /// a literal such as an unbalanced `(` surfaces here.
    InvalidMatcher {
        /// The offending pattern.
        pattern: String,
        /// The underlying regex error message.
        source: String,
    },
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName { pattern, name } => {
                write!(
                    f,
                    "invalid placeholder name \"{name}\" in pattern \"{pattern}\": \
                     names must be simple identifiers"
                )
            }
            Self::DuplicateName { pattern, name } => {
                write!(
                    f,
                    "duplicate placeholder name \"{name}\" in pattern \"{pattern}\""
                )
            }
            Self::InvalidMatcher { pattern, source } => {
                write!(
                    f,
                    "pattern \"{pattern}\" does not compile to a valid matcher: {source}"
                )
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Errors from a single reverse-path construction attempt.
///
/// Local to one [`Rule::make_path`] call. [`Router::url_for`] swallows these
/// while iterating a handler's rules and only surfaces the aggregate failure
/// as [`RoutingError::NoBuildableRoute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Both positional and named arguments were supplied.
    AmbiguousArguments,
    /// The positional argument count does not equal the declared keyword
    /// count.
    ArityMismatch {
        /// Number of keywords the pattern declares.
        expected: usize,
        /// Number of positional values supplied.
        given: usize,
    },
    /// A declared keyword is missing from the named arguments.
    MissingKeyword {
        /// The missing keyword.
        name: String,
    },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousArguments => {
                write!(f, "cannot build a path from both positional and named arguments")
            }
            Self::ArityMismatch { expected, given } => {
                write!(
                    f,
                    "pattern takes {expected} positional arguments, but {given} were given"
                )
            }
            Self::MissingKeyword { name } => {
                write!(f, "missing required keyword \"{name}\"")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Errors from forward or reverse resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// No rule matched the path in either the exact or the pattern pass.
    NoMatch {
        /// The normalized path that failed to resolve.
        path: String,
    },
    /// None of the handler's rules could build a path from the supplied
    /// arguments, or the handler owns no rules at all.
    NoBuildableRoute {
        /// Registered name of the target handler.
        handler: String,
        /// The arguments that were supplied, for diagnostics.
        args: RouteArgs,
    },
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch { path } => write!(f, "no route to path \"{path}\""),
            Self::NoBuildableRoute { handler, args } => {
                write!(f, "no known paths to \"{handler}\" with arguments {args}")
            }
        }
    }
}

impl std::error::Error for RoutingError {}
