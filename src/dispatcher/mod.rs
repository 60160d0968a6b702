//! # Dispatcher Module
//!
//! Invokes the handler of the first route matching an incoming request.
//!
//! ## Overview
//!
//! The dispatcher sits between the request source and the route table:
//!
//! 1. The request method is uppercased and the query string dropped
//! 2. The router resolves the method bucket in registration order
//! 3. The first matching route's handler is invoked with the path parameters
//! 4. The handler's response (or error) is returned to the caller
//!
//! ## At-most-once dispatch
//!
//! Each [`Dispatcher`] owns a guard flag. The first call to
//! [`Dispatcher::dispatch`] sets it, matched or not, and later calls return
//! [`Dispatch::Skipped`]. The guard is scoped to the dispatcher rather than
//! the process, so a long-lived server creates one dispatcher per request.
//!
//! ## Empty route table
//!
//! When nothing has been registered, dispatch returns [`Dispatch::Welcome`]
//! with an informational JSON body instead of failing with
//! `NoRouteMatched`.
//!
//! ## Example
//!
//! ```rust
//! use fnrouter::dispatcher::{handler_fn, Dispatch, Dispatcher, HandlerResponse};
//! use fnrouter::router::Router;
//!
//! let mut router = Router::new();
//! router
//!     .get("/pets/{id}", handler_fn(|req| {
//!         Ok(HandlerResponse::json(200, serde_json::json!({ "id": req.get_path_param("id") })))
//!     }))
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(&router);
//! match dispatcher.dispatch("get", "/pets/7?verbose=1").unwrap() {
//!     Dispatch::Handled(resp) => assert_eq!(resp.body["id"], "7"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(matches!(dispatcher.dispatch("GET", "/pets/7").unwrap(), Dispatch::Skipped));
//! ```

mod core;

pub use core::{
    handler_fn, Dispatch, Dispatcher, Handler, HandlerRequest, HandlerResponse, HeaderVec,
    MAX_INLINE_HEADERS,
};
