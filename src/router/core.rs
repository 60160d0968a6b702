//! Route table, registration and matching.

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::group::RouteGroup;
use super::pattern::CompiledPattern;
use crate::dispatcher::{Dispatcher, Handler};
use crate::error::RouterError;
use crate::path::{format_path, join_paths, strip_query};

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 (e.g. /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage, in left-to-right placeholder order.
///
/// Names are `Arc<str>` shared with the compiled pattern; values are
/// per-request data from the URI.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A registered route.
///
/// `path` is the declared path with group prefixes applied; the router prefix
/// is only applied in the compiled pattern, so it is never counted twice.
#[derive(Clone)]
pub struct Route {
    method: Method,
    path: String,
    handler: Arc<dyn Handler>,
    pattern: CompiledPattern,
    seq: usize,
}

impl Route {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path as registered, group prefixes included, router prefix excluded.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Effective path matched at dispatch time (router prefix included).
    #[must_use]
    pub fn full_path(&self) -> &str {
        self.pattern.path()
    }

    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("full_path", &self.full_path())
            .finish_non_exhaustive()
    }
}

/// Result of successfully matching a request to a route
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    /// The matched route
    pub route: &'r Route,
    /// Normalized request path the route was matched against
    pub path: String,
    /// Path parameters extracted from the URI (e.g. `{id}` → `("id", "123")`)
    pub path_params: ParamVec,
}

impl RouteMatch<'_> {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics if a name were to appear twice.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to a HashMap
    /// Note: This allocates - use get_path_param() where possible
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Function-registration route table.
///
/// Routes live in one bucket per method, in registration order. Matching is
/// ordered first-match: the first route in the bucket whose pattern matches
/// wins, regardless of how specific later routes are.
#[derive(Clone, Default)]
pub struct Router {
    routes: HashMap<Method, Vec<Route>>,
    /// Global prefix, canonical or empty
    router_prefix: String,
    route_count: usize,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The global prefix, or `""` if none is set.
    #[must_use]
    pub fn router_prefix(&self) -> &str {
        &self.router_prefix
    }

    /// Set the global prefix applied to every route.
    ///
    /// May be called before or after routes are registered; existing routes
    /// are recompiled against the new prefix. `""` and `"/"` clear it.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] if a route no longer compiles with the
    /// prefix (e.g. the prefix itself contains a malformed placeholder). The
    /// router is left unchanged in that case.
    pub fn set_router_prefix(&mut self, prefix: &str) -> Result<&mut Self, RouterError> {
        let canonical = format_path(prefix);
        let prefix = if canonical == "/" {
            String::new()
        } else {
            canonical
        };

        let mut routes: Vec<&mut Route> = self.routes.values_mut().flatten().collect();
        let recompiled = routes
            .iter()
            .map(|r| CompiledPattern::compile(&join_paths(&prefix, &r.path)))
            .collect::<Result<Vec<_>, _>>()?;
        for (route, pattern) in routes.iter_mut().zip(recompiled) {
            route.pattern = pattern;
        }

        info!(
            router_prefix = %prefix,
            routes_count = self.route_count,
            "Router prefix set"
        );
        self.router_prefix = prefix;
        Ok(self)
    }

    /// Register routes under a path prefix.
    ///
    /// The callback runs synchronously with a [`RouteGroup`] carrying the
    /// canonical prefix; nested groups compose their prefixes.
    ///
    /// # Errors
    ///
    /// Whatever the callback returns.
    pub fn group<F>(&mut self, prefix: &str, register: F) -> Result<&mut Self, RouterError>
    where
        F: FnOnce(&mut RouteGroup<'_>) -> Result<(), RouterError>,
    {
        let mut group = RouteGroup::new(self, format_path(prefix));
        register(&mut group)?;
        Ok(self)
    }

    /// Register a route.
    ///
    /// `method` is trimmed and uppercased. Duplicate (method, path) pairs are
    /// allowed; the first one registered wins at dispatch.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidMethod`] or [`RouterError::InvalidPattern`].
    pub fn add_route<H>(
        &mut self,
        method: &str,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouterError>
    where
        H: Handler + 'static,
    {
        let method = parse_method(method)?;
        self.register("", method, path, Arc::new(handler))?;
        Ok(self)
    }

    /// Register a route with a handler that is already shared.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidMethod`] or [`RouterError::InvalidPattern`].
    pub fn add_shared_route(
        &mut self,
        method: &str,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, RouterError> {
        let method = parse_method(method)?;
        self.register("", method, path, handler)?;
        Ok(self)
    }

    method_shortcuts!();

    fn register_method<H>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouterError>
    where
        H: Handler + 'static,
    {
        self.register("", method, path, Arc::new(handler))?;
        Ok(self)
    }

    /// Insert a route whose group prefix is already canonical.
    pub(crate) fn register(
        &mut self,
        group_prefix: &str,
        method: Method,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RouterError> {
        let path = join_paths(group_prefix, &format_path(path));
        let pattern = CompiledPattern::compile(&join_paths(&self.router_prefix, &path))?;

        debug!(
            method = %method,
            path = %path,
            full_path = %pattern.path(),
            params = ?pattern.param_names(),
            "Route registered"
        );

        let seq = self.route_count;
        self.route_count += 1;
        self.routes.entry(method.clone()).or_default().push(Route {
            method,
            path,
            handler,
            pattern,
            seq,
        });
        Ok(())
    }

    /// Number of registered routes across all methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Routes registered for `method`, in registration order.
    #[must_use]
    pub fn routes_for(&self, method: &Method) -> &[Route] {
        self.routes.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All routes, in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<&Route> {
        let mut all: Vec<&Route> = self.routes.values().flatten().collect();
        all.sort_by_key(|r| r.seq);
        all
    }

    /// Print all registered routes to stdout
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump_routes(&self) {
        println!(
            "[routes] router_prefix={} count={}",
            if self.router_prefix.is_empty() {
                "-"
            } else {
                self.router_prefix.as_str()
            },
            self.route_count
        );
        for route in self.routes() {
            println!("[route] {} {}", route.method, route.full_path());
        }
    }

    /// Create a dispatcher (a single-dispatch request context) for this router.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self)
    }

    /// Find the first route matching `method` and `uri` without invoking it.
    ///
    /// The method is trimmed and uppercased, the query string dropped and the
    /// path canonicalized before matching.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoRouteMatched`] carrying the normalized URI.
    pub fn resolve(&self, method: &str, uri: &str) -> Result<RouteMatch<'_>, RouterError> {
        let method_name = method.trim().to_ascii_uppercase();
        let path = format_path(strip_query(uri));

        debug!(
            method = %method_name,
            path = %path,
            "Route match attempt"
        );

        let match_start = Instant::now();
        let bucket = Method::from_bytes(method_name.as_bytes())
            .ok()
            .map(|m| self.routes_for(&m))
            .unwrap_or(&[]);

        for route in bucket {
            if let Some(params) = route.pattern.captures(&path) {
                let match_duration = match_start.elapsed();
                if match_duration > Duration::from_millis(1) {
                    warn!(
                        method = %method_name,
                        path = %path,
                        route_pattern = %route.full_path(),
                        path_params = ?params,
                        duration_us = match_duration.as_micros() as u64,
                        candidates = bucket.len(),
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        method = %method_name,
                        path = %path,
                        route_pattern = %route.full_path(),
                        path_params = ?params,
                        duration_us = match_duration.as_micros() as u64,
                        "Route matched"
                    );
                }
                return Ok(RouteMatch {
                    route,
                    path,
                    path_params: params,
                });
            }
        }

        warn!(
            method = %method_name,
            path = %path,
            candidates = bucket.len(),
            duration_us = match_start.elapsed().as_micros() as u64,
            "No route matched"
        );

        Err(RouterError::NoRouteMatched {
            method: method_name,
            uri: path,
        })
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("router_prefix", &self.router_prefix)
            .field("routes", &self.routes())
            .finish()
    }
}

/// Trim and uppercase a method name and check it is a valid HTTP token.
pub(crate) fn parse_method(method: &str) -> Result<Method, RouterError> {
    let upper = method.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(RouterError::InvalidMethod(method.to_string()));
    }
    Method::from_bytes(upper.as_bytes()).map_err(|_| RouterError::InvalidMethod(method.to_string()))
}
