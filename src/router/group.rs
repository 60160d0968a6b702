//! Prefix groups.
//!
//! A [`RouteGroup`] is a borrowed view of a [`Router`] that carries its own
//! canonical prefix. Nested groups get a new value with the composed prefix,
//! so a child prefix is never visible to its parent or siblings once the
//! child's callback returns.

use http::Method;
use std::sync::Arc;

use super::core::{parse_method, Router};
use crate::dispatcher::Handler;
use crate::error::RouterError;
use crate::path::join_paths;

/// Registration handle for routes sharing a path prefix.
///
/// ```rust
/// use fnrouter::dispatcher::{handler_fn, HandlerResponse};
/// use fnrouter::router::Router;
///
/// let mut router = Router::new();
/// router
///     .group("/admin", |admin| {
///         admin.get("/users", handler_fn(|_| Ok(HandlerResponse::text(200, "users"))))?;
///         admin.group("/reports", |reports| {
///             reports.get("/{year}", handler_fn(|_| Ok(HandlerResponse::text(200, "report"))))?;
///             Ok(())
///         })?;
///         Ok(())
///     })
///     .unwrap();
///
/// let paths: Vec<&str> = router.routes().iter().map(|r| r.full_path()).collect();
/// assert_eq!(paths, vec!["/admin/users", "/admin/reports/{year}"]);
/// ```
pub struct RouteGroup<'r> {
    router: &'r mut Router,
    prefix: String,
}

impl<'r> RouteGroup<'r> {
    pub(crate) fn new(router: &'r mut Router, prefix: String) -> Self {
        Self { router, prefix }
    }

    /// Canonical prefix of this group (parents included).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a nested group; its prefix is appended to this group's.
    ///
    /// # Errors
    ///
    /// Whatever the callback returns.
    pub fn group<F>(&mut self, prefix: &str, register: F) -> Result<&mut Self, RouterError>
    where
        F: FnOnce(&mut RouteGroup<'_>) -> Result<(), RouterError>,
    {
        let mut child = RouteGroup {
            router: &mut *self.router,
            prefix: join_paths(&self.prefix, prefix),
        };
        register(&mut child)?;
        Ok(self)
    }

    /// Register a route under this group's prefix.
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
        self.router
            .register(&self.prefix, method, path, Arc::new(handler))?;
        Ok(self)
    }

    /// Register a route with a shared handler under this group's prefix.
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
        self.router.register(&self.prefix, method, path, handler)?;
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
        self.router
            .register(&self.prefix, method, path, Arc::new(handler))?;
        Ok(self)
    }
}
