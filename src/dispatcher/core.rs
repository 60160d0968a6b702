//! Dispatcher core: handler contract, request/response types and the
//! at-most-once dispatch guard.

use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::RouterError;
use crate::ids::DispatchId;
use crate::router::{ParamVec, Router};

/// Maximum inline response headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated response header storage.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// What a handler receives for the matched route.
///
/// Carries the captured path parameters only; query string and body are not
/// passed implicitly.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Id of the dispatcher that invoked the handler, for log correlation
    pub dispatch_id: DispatchId,
    /// Normalized request method
    pub method: Method,
    /// Normalized request path (query string removed)
    pub path: String,
    /// Effective pattern of the matched route, router prefix included
    pub route_pattern: String,
    /// Path parameters in left-to-right order
    pub path_params: ParamVec,
}

impl HandlerRequest {
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
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Response produced by a handler (or by the dispatcher's welcome fallback).
///
/// A `Value::String` body is written as `text/plain`, anything else as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a content-type header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a plain-text response
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "text/plain".to_string()));
        Self {
            status,
            headers,
            body: Value::String(body.into()),
        }
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (case-insensitive)
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// A route handler.
///
/// Invoked synchronously, at most once per dispatcher. Errors are returned to
/// the dispatch caller unmodified, wrapped in [`RouterError::Handler`].
pub trait Handler: Send + Sync {
    fn handle(&self, req: &HandlerRequest) -> anyhow::Result<HandlerResponse>;
}

impl<F> Handler for F
where
    F: Fn(&HandlerRequest) -> anyhow::Result<HandlerResponse> + Send + Sync,
{
    fn handle(&self, req: &HandlerRequest) -> anyhow::Result<HandlerResponse> {
        self(req)
    }
}

/// Pin a closure to the handler signature so its argument and error types
/// are inferred.
///
/// ```
/// use fnrouter::dispatcher::{handler_fn, HandlerResponse};
/// use fnrouter::router::Router;
///
/// let mut router = Router::new();
/// router
///     .get("/hello/{name}", handler_fn(|req| {
///         let name = req.get_path_param("name").unwrap_or("world");
///         Ok(HandlerResponse::text(200, format!("hello {name}")))
///     }))
///     .unwrap();
/// ```
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&HandlerRequest) -> anyhow::Result<HandlerResponse> + Send + Sync + 'static,
{
    f
}

/// Result of a [`Dispatcher::dispatch`] call that did not fail.
#[derive(Debug)]
pub enum Dispatch {
    /// A route matched and its handler returned this response
    Handled(HandlerResponse),
    /// The router has no routes; this is the default informational response
    Welcome(HandlerResponse),
    /// This dispatcher already dispatched once; nothing was done
    Skipped,
}

impl Dispatch {
    /// The response to send, if any
    #[must_use]
    pub fn into_response(self) -> Option<HandlerResponse> {
        match self {
            Dispatch::Handled(resp) | Dispatch::Welcome(resp) => Some(resp),
            Dispatch::Skipped => None,
        }
    }
}

/// Dispatches one request against a [`Router`].
///
/// A dispatcher is a request context: it invokes at most one handler over its
/// lifetime. The first call to [`dispatch`](Self::dispatch) flips the guard,
/// whether or not a route matches; every later call returns
/// [`Dispatch::Skipped`]. A server handling many requests creates one
/// dispatcher per request from a shared, read-only router.
pub struct Dispatcher<'r> {
    router: &'r Router,
    id: DispatchId,
    dispatched: AtomicBool,
    welcome: Option<HandlerResponse>,
}

impl<'r> Dispatcher<'r> {
    #[must_use]
    pub fn new(router: &'r Router) -> Self {
        Self {
            router,
            id: DispatchId::new(),
            dispatched: AtomicBool::new(false),
            welcome: None,
        }
    }

    /// Replace the response returned when the router has no routes.
    #[must_use]
    pub fn with_welcome(mut self, response: HandlerResponse) -> Self {
        self.welcome = Some(response);
        self
    }

    /// Use a caller-supplied id (e.g. propagated from an upstream request id).
    #[must_use]
    pub fn with_id(mut self, id: DispatchId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> DispatchId {
        self.id
    }

    /// `true` once [`dispatch`](Self::dispatch) has been called.
    #[must_use]
    pub fn has_dispatched(&self) -> bool {
        self.dispatched.load(Ordering::Acquire)
    }

    /// Match `method`/`uri` and invoke the first matching route's handler.
    ///
    /// # Errors
    ///
    /// - [`RouterError::NoRouteMatched`] when no route for the method matches
    ///   the normalized URI.
    /// - [`RouterError::Handler`] when the handler fails.
    pub fn dispatch(&self, method: &str, uri: &str) -> Result<Dispatch, RouterError> {
        if self.dispatched.swap(true, Ordering::AcqRel) {
            debug!(
                dispatch_id = %self.id,
                method = %method,
                uri = %uri,
                "Dispatch already performed - skipping"
            );
            return Ok(Dispatch::Skipped);
        }

        if self.router.is_empty() {
            info!(
                dispatch_id = %self.id,
                routes_count = 0,
                "No routes registered - returning welcome response"
            );
            return Ok(Dispatch::Welcome(self.welcome_response()));
        }

        let matched = self.router.resolve(method, uri)?;
        let route = matched.route;
        let request = HandlerRequest {
            dispatch_id: self.id,
            method: route.method().clone(),
            path: matched.path,
            route_pattern: route.full_path().to_string(),
            path_params: matched.path_params,
        };

        info!(
            dispatch_id = %self.id,
            method = %request.method,
            path = %request.path,
            route_pattern = %request.route_pattern,
            "Request dispatched to handler"
        );

        let start = Instant::now();
        let response = route.handler().handle(&request).map_err(|e| {
            error!(
                dispatch_id = %self.id,
                route_pattern = %request.route_pattern,
                error = %e,
                "Handler failed"
            );
            RouterError::Handler(e)
        })?;

        info!(
            dispatch_id = %self.id,
            route_pattern = %request.route_pattern,
            status = response.status,
            latency_us = start.elapsed().as_micros() as u64,
            "Handler response received"
        );

        Ok(Dispatch::Handled(response))
    }

    fn welcome_response(&self) -> HandlerResponse {
        self.welcome.clone().unwrap_or_else(|| {
            HandlerResponse::json(
                200,
                serde_json::json!({
                    "message": "fnrouter is running",
                    "routes": 0,
                    "hint": "register a route to replace this response",
                }),
            )
        })
    }
}
