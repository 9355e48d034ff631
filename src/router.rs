//! `Router` — registration, forward resolution, reverse resolution.
//!
//! Routes are registered on a [`RouterBuilder`]; [`RouterBuilder::build`]
//! freezes them into an immutable [`Router`]. The route table is an ordered
//! list of (handler, rule) entries: registration order is the tie-break
//! within each resolution pass.
//!
//! # Two-pass forward resolution
//!
//! Both [`Router::route_for`] and [`Router::dispatch`] scan the full table
//! twice: an exact pass (literal rules only, no regex engine) and then a
//! pattern pass. An exact match always outranks a pattern match, no matter
//! which was registered first.

use crate::convert::try_convert;
use crate::invocation::{parse_query, Invocation, QueryMap};
use crate::pattern::normalize;
use crate::rule::Rule;
use crate::{Coerced, PatternError, RouteArgs, RoutingError};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use url::Url;

/// Opaque identifier for a registered handler.
///
/// Returned by [`RouterBuilder::handler`]; reverse lookups go through this
/// identifier rather than through any notion of callable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// A registered handler callable.
///
/// Receives the router itself (so a handler can call
/// [`Router::url_for`] or [`Router::redirect`]) and the invocation context.
pub type Handler<R> = Box<dyn Fn(&Router<R>, &Invocation) -> R + Send + Sync>;

struct RouteEntry {
    handler: HandlerId,
    rule: Rule,
}

/// Builder for [`Router`]: the registration phase.
///
/// Configuration (base URL, argument coercion) chains by value; handler and
/// route registration borrow mutably because [`handler`](Self::handler)
/// needs to hand back a [`HandlerId`].
pub struct RouterBuilder<R> {
    base_url: String,
    convert_args: bool,
    handlers: Vec<(String, Handler<R>)>,
    table: Vec<RouteEntry>,
}

impl<R> Default for RouterBuilder<R> {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            convert_args: false,
            handlers: Vec::new(),
            table: Vec::new(),
        }
    }
}

impl<R> RouterBuilder<R> {
    /// Create a builder with no base URL and coercion off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL prepended to reverse-routed paths and stripped from
    /// incoming ones, e.g. `plugin://my.plugin`.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enable best-effort coercion of captured placeholder values (see
    /// [`try_convert`]).
    #[must_use]
    pub fn convert_args(mut self, convert_args: bool) -> Self {
        self.convert_args = convert_args;
        self
    }

    /// Register a handler callable under a diagnostic name.
    ///
    /// The returned [`HandlerId`] is how routes are attached and how
    /// reverse lookups address the handler. The name only appears in error
    /// payloads and logs.
    pub fn handler(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&Router<R>, &Invocation) -> R + Send + Sync + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.handlers.len());
        self.handlers.push((name.into(), Box::new(handler)));
        id
    }

    /// Compile `pattern` and append it to the route table for `handler`.
    ///
    /// A handler may own any number of routes; reverse routing tries them
    /// in registration order.
    ///
    /// # Errors
    ///
    /// [`PatternError`] if the pattern does not compile.
    pub fn route(&mut self, handler: HandlerId, pattern: &str) -> Result<(), PatternError> {
        debug_assert!(handler.0 < self.handlers.len(), "foreign HandlerId");
        let rule = Rule::new(pattern)?;
        self.table.push(RouteEntry { handler, rule });
        Ok(())
    }

    /// Freeze the table into an immutable [`Router`].
    #[must_use]
    pub fn build(self) -> Router<R> {
        Router {
            base_url: self.base_url,
            convert_args: self.convert_args,
            handlers: self.handlers,
            table: self.table,
        }
    }
}

/// The frozen routing engine.
///
/// See the [crate docs](crate) for an end-to-end example.
pub struct Router<R> {
    base_url: String,
    convert_args: bool,
    handlers: Vec<(String, Handler<R>)>,
    table: Vec<RouteEntry>,
}

impl<R> Router<R> {
    /// Start a [`RouterBuilder`].
    #[must_use]
    pub fn builder() -> RouterBuilder<R> {
        RouterBuilder::new()
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The rules owned by `handler`, in registration order.
    pub fn rules_for(&self, handler: HandlerId) -> impl Iterator<Item = &Rule> {
        self.table
            .iter()
            .filter(move |entry| entry.handler == handler)
            .map(|entry| &entry.rule)
    }

    /// Strip the base URL prefix (when present) and normalize trailing
    /// slashes.
    fn local_path<'a>(&self, path: &'a str) -> &'a str {
        let path = path.strip_prefix(self.base_url.as_str()).unwrap_or(path);
        normalize(path)
    }

    fn handler_name(&self, handler: HandlerId) -> &str {
        self.handlers
            .get(handler.0)
            .map_or("<unregistered>", |(name, _)| name.as_str())
    }

    /// Resolve `path` to the handler that would be dispatched.
    ///
    /// Exact pass over the full table in registration order, then pattern
    /// pass. `None` if neither pass finds a match.
    #[must_use]
    pub fn route_for(&self, path: &str) -> Option<HandlerId> {
        let path = self.local_path(path);
        for entry in &self.table {
            if entry.rule.exact_match(path) {
                return Some(entry.handler);
            }
        }
        for entry in &self.table {
            if entry.rule.captures(path).is_some() {
                return Some(entry.handler);
            }
        }
        None
    }

    /// Construct a full URL for `handler` from the given arguments.
    ///
    /// Tries only the rules owned by `handler`, in registration order; the
    /// first rule whose [`Rule::make_path`] succeeds wins. Per-rule build
    /// failures are swallowed.
    ///
    /// # Errors
    ///
    /// [`RoutingError::NoBuildableRoute`] when the handler owns no rules or
    /// every rule rejected the arguments. The error carries the handler's
    /// registered name and the supplied arguments.
    pub fn url_for(&self, handler: HandlerId, args: &RouteArgs) -> Result<String, RoutingError> {
        for rule in self.rules_for(handler) {
            if let Ok(path) = rule.make_path(args.positional(), args.named()) {
                return Ok(self.url_for_path(&path));
            }
        }
        Err(RoutingError::NoBuildableRoute {
            handler: self.handler_name(handler).to_owned(),
            args: args.clone(),
        })
    }

    /// The full URL for an already-built path: base URL plus `path` with
    /// exactly one joining slash.
    #[must_use]
    pub fn url_for_path(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Resolve `path` and invoke the matched handler.
    ///
    /// Exact hit: the handler runs with no placeholder arguments. Pattern
    /// hit: the handler runs with the captured arguments, coerced when the
    /// router was built with `convert_args(true)`. The query mapping is
    /// exposed to the handler as-is in both cases.
    ///
    /// Whatever the handler returns propagates unmodified, including a
    /// handler-level error when `R` is itself a `Result`.
    ///
    /// # Errors
    ///
    /// [`RoutingError::NoMatch`] when neither pass matches.
    pub fn dispatch(&self, path: &str, query: QueryMap) -> Result<R, RoutingError> {
        let local = self.local_path(path).to_owned();

        for entry in &self.table {
            if !entry.rule.exact_match(&local) {
                continue;
            }
            let Some((name, handler)) = self.handlers.get(entry.handler.0) else {
                continue;
            };
            debug!(handler = %name, path = %local, "dispatching, exact match");
            let invocation = Invocation::new(local, HashMap::new(), query);
            return Ok(handler(self, &invocation));
        }

        for entry in &self.table {
            let Some(captures) = entry.rule.captures(&local) else {
                continue;
            };
            let Some((name, handler)) = self.handlers.get(entry.handler.0) else {
                continue;
            };
            let args: HashMap<String, Coerced> = captures
                .into_iter()
                .map(|(keyword, value)| {
                    let value = if self.convert_args {
                        try_convert(&value)
                    } else {
                        Coerced::Unchanged(value)
                    };
                    (keyword, value)
                })
                .collect();
            debug!(handler = %name, path = %local, args = ?args, "dispatching, pattern match");
            let invocation = Invocation::new(local, args, query);
            return Ok(handler(self, &invocation));
        }

        Err(RoutingError::NoMatch { path: local })
    }

    /// Re-enter [`dispatch`](Self::dispatch) from inside a handler, for
    /// internal re-routing without a new host invocation.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub fn redirect(&self, path: &str, query: QueryMap) -> Result<R, RoutingError> {
        self.dispatch(path, query)
    }

    /// Adapter entry point: split a raw invocation URL into path and query,
    /// then dispatch.
    ///
    /// `query_string` is the host-provided query (with or without a leading
    /// `?`); when empty, any query embedded in `url` is used instead.
    ///
    /// # Errors
    ///
    /// Same as [`dispatch`](Self::dispatch).
    pub fn run(&self, url: &str, query_string: &str) -> Result<R, RoutingError> {
        let (path, inline_query) = split_invocation(url);
        let query = if query_string.is_empty() {
            inline_query.as_deref().unwrap_or("")
        } else {
            query_string
        };
        self.dispatch(&path, parse_query(query))
    }
}

impl<R> fmt::Debug for Router<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("base_url", &self.base_url)
            .field("convert_args", &self.convert_args)
            .field("handlers", &self.handlers.len())
            .field("routes", &self.table.len())
            .finish()
    }
}

/// Split a raw invocation URL into its path and embedded query, falling
/// back to a plain `?` split when the string is not an absolute URL.
fn split_invocation(url: &str) -> (String, Option<String>) {
    match Url::parse(url) {
        Ok(parsed) => (
            parsed.path().to_owned(),
            parsed.query().map(str::to_owned),
        ),
        Err(_) => match url.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (url.to_owned(), None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_router() -> (Router<&'static str>, HandlerId, HandlerId) {
        let mut builder = Router::builder().base_url("plugin://py.test");
        let with_args = builder.handler("with_args", |_, _| "with_args");
        let literal = builder.handler("literal", |_, _| "literal");
        builder.route(with_args, "/foo/<a>/<b>").unwrap();
        builder.route(literal, "/foo/a/b").unwrap();
        (builder.build(), with_args, literal)
    }

    #[test]
    fn test_route_for_strips_base_url() {
        let (router, _, literal) = test_router();
        assert_eq!(router.route_for("plugin://py.test/foo/a/b"), Some(literal));
        assert_eq!(router.route_for("/foo/a/b"), Some(literal));
    }

    #[test]
    fn test_exact_beats_pattern_regardless_of_order() {
        // Pattern rule registered first; the exact rule still wins.
        let (router, with_args, literal) = test_router();
        assert_eq!(router.route_for("/foo/a/b"), Some(literal));
        assert_eq!(router.route_for("/foo/1/2"), Some(with_args));
    }

    #[test]
    fn test_route_for_no_match() {
        let (router, _, _) = test_router();
        assert_eq!(router.route_for("plugin://py.test/foo"), None);
    }

    #[test]
    fn test_url_for_named_and_positional_agree() {
        let (router, with_args, _) = test_router();
        let named = router
            .url_for(with_args, &RouteArgs::new().kwarg("a", 1).kwarg("b", 2))
            .unwrap();
        let positional = router
            .url_for(with_args, &RouteArgs::new().arg(1).arg(2))
            .unwrap();
        assert_eq!(named, "plugin://py.test/foo/1/2");
        assert_eq!(named, positional);
    }

    #[test]
    fn test_url_for_wrong_arity_is_unbuildable() {
        let (router, with_args, _) = test_router();
        let args = RouteArgs::new().arg(1);
        assert_eq!(
            router.url_for(with_args, &args),
            Err(RoutingError::NoBuildableRoute {
                handler: "with_args".to_owned(),
                args,
            })
        );
    }

    #[test]
    fn test_url_for_tries_rules_in_registration_order() {
        let mut builder = Router::<&str>::builder().base_url("plugin://py.test");
        let multi = builder.handler("multi", |_, _| "multi");
        builder.route(multi, "/by-id/<id>").unwrap();
        builder.route(multi, "/by-name/<name>").unwrap();
        let router = builder.build();

        // First rule rejects (missing keyword), second builds.
        assert_eq!(
            router
                .url_for(multi, &RouteArgs::new().kwarg("name", "x"))
                .unwrap(),
            "plugin://py.test/by-name/x"
        );
        // Positional arguments hit the first rule.
        assert_eq!(
            router.url_for(multi, &RouteArgs::new().arg(7)).unwrap(),
            "plugin://py.test/by-id/7"
        );
    }

    #[test]
    fn test_url_for_path_joins_exactly_one_slash() {
        let (router, _, _) = test_router();
        assert_eq!(router.url_for_path("/baz"), "plugin://py.test/baz");
        assert_eq!(router.url_for_path("baz"), "plugin://py.test/baz");
    }

    #[test]
    fn test_dispatch_exact_has_no_args() {
        let mut builder = Router::builder().base_url("plugin://py.test");
        let foo = builder.handler("foo", |_, inv| inv.args().len());
        builder.route(foo, "/foo").unwrap();
        let router = builder.build();
        assert_eq!(router.dispatch("/foo", QueryMap::new()), Ok(0));
    }

    #[test]
    fn test_dispatch_pattern_captures_args() {
        let mut builder = Router::builder();
        let show = builder.handler("show", |_, inv| inv.arg("id").unwrap().to_string());
        builder.route(show, "/show/<id>").unwrap();
        let router = builder.build();
        assert_eq!(
            router.dispatch("/show/42", QueryMap::new()),
            Ok("42".to_owned())
        );
    }

    #[test]
    fn test_dispatch_no_match() {
        let (router, _, _) = test_router();
        assert_eq!(
            router.dispatch("/nope", QueryMap::new()),
            Err(RoutingError::NoMatch {
                path: "/nope".to_owned()
            })
        );
    }

    #[test]
    fn test_dispatch_coerces_when_enabled() {
        let mut builder = Router::builder().convert_args(true);
        let show = builder.handler("show", |_, inv| inv.arg("id").cloned().unwrap());
        builder.route(show, "/show/<id>").unwrap();
        let router = builder.build();
        assert_eq!(
            router.dispatch("/show/42", QueryMap::new()),
            Ok(Coerced::Integer(42))
        );
    }

    #[test]
    fn test_dispatch_leaves_args_unchanged_by_default() {
        let mut builder = Router::builder();
        let show = builder.handler("show", |_, inv| inv.arg("id").cloned().unwrap());
        builder.route(show, "/show/<id>").unwrap();
        let router = builder.build();
        assert_eq!(
            router.dispatch("/show/42", QueryMap::new()),
            Ok(Coerced::Unchanged("42".to_owned()))
        );
    }

    #[test]
    fn test_redirect_from_inside_a_handler() {
        let mut builder = Router::builder();
        let target = builder.handler("target", |_, _| "target".to_owned());
        let hop = builder.handler("hop", |router, inv| {
            router
                .redirect("/target", inv.query().clone())
                .unwrap_or_else(|e| e.to_string())
        });
        builder.route(target, "/target").unwrap();
        builder.route(hop, "/hop").unwrap();
        let router = builder.build();
        assert_eq!(
            router.dispatch("/hop", QueryMap::new()),
            Ok("target".to_owned())
        );
    }

    #[test]
    fn test_run_splits_url_and_query() {
        let mut builder = Router::builder();
        let foo = builder.handler("foo", |_, inv| inv.query_param("bar").map(str::to_owned));
        builder.route(foo, "/foo").unwrap();
        let router = builder.build();
        assert_eq!(
            router.run("plugin://py.test/foo", "?bar=baz"),
            Ok(Some("baz".to_owned()))
        );
    }

    #[test]
    fn test_run_bare_base_url_is_root() {
        let mut builder = Router::builder();
        let root = builder.handler("root", |_, _| "root");
        builder.route(root, "/").unwrap();
        let router = builder.build();
        assert_eq!(router.run("plugin://py.test", ""), Ok("root"));
        assert_eq!(router.run("plugin://py.test/", ""), Ok("root"));
    }

    #[test]
    fn test_rules_for_lists_only_own_rules() {
        let (router, with_args, literal) = test_router();
        let patterns: Vec<&str> = router.rules_for(with_args).map(Rule::pattern).collect();
        assert_eq!(patterns, ["/foo/<a>/<b>"]);
        assert_eq!(router.rules_for(literal).count(), 1);
    }
}
