//! # fnrouter
//!
//! **fnrouter** is a function-registration HTTP router: register
//! `(method, path pattern, handler)` tuples, optionally nested under prefix
//! groups and a global router prefix, then dispatch one incoming
//! `(method, URI)` pair to the first matching route.
//!
//! ## Architecture
//!
//! - **[`path`]** - canonical path form (one leading `/`, no trailing `/`)
//! - **[`router`]** - route table, prefix groups, braced pattern compilation
//!   and ordered first-match resolution
//! - **[`dispatcher`]** - handler contract and the at-most-once dispatch
//!   request context
//! - **[`cgi`]** - CGI request source and response writer
//! - **[`config`]** - declarative route files (YAML/JSON) and env overrides
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`cli`]** - the `fnrouter` binary
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Source as RequestSource
//!     participant Dispatcher
//!     participant Router
//!     participant Handler
//!     participant Sink as write_response
//!
//!     Source->>Dispatcher: dispatch("get", "/api/users/42?x=1")
//!     Dispatcher->>Dispatcher: guard: already dispatched? → Skipped
//!     Dispatcher->>Router: resolve("GET", "/api/users/42")
//!     Router->>Router: scan GET bucket in registration order
//!     Router-->>Dispatcher: RouteMatch {id: "42"}
//!     Dispatcher->>Handler: handle(&HandlerRequest)
//!     Handler-->>Dispatcher: HandlerResponse
//!     Dispatcher-->>Source: Dispatch::Handled(response)
//!     Source->>Sink: status + headers + body, once
//! ```
//!
//! ## Path patterns
//!
//! - `/users/{id}`: `id` matches one or more characters other than `/`
//! - `/files/{path:.+}`: the fragment after `:` is used verbatim
//! - every other character is literal
//!
//! ## Quick Start
//!
//! ```rust
//! use fnrouter::dispatcher::{handler_fn, Dispatch, HandlerResponse};
//! use fnrouter::router::Router;
//!
//! # fn main() -> Result<(), fnrouter::RouterError> {
//! let mut router = Router::new();
//! router.set_router_prefix("/api")?;
//! router.group("/admin", |admin| {
//!     admin.get("/users/{id}", handler_fn(|req| {
//!         let id = req.get_path_param("id").unwrap_or_default();
//!         Ok(HandlerResponse::json(200, serde_json::json!({ "id": id })))
//!     }))?;
//!     Ok(())
//! })?;
//!
//! let dispatcher = router.dispatcher();
//! if let Dispatch::Handled(resp) = dispatcher.dispatch("GET", "/api/admin/users/42")? {
//!     assert_eq!(resp.body["id"], "42");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cgi;
pub mod cli;
pub mod config;
pub mod dispatcher;
mod echo;
pub mod error;
pub mod ids;
pub mod logging;
pub mod path;
pub mod router;

pub use dispatcher::{handler_fn, Dispatch, Dispatcher, Handler, HandlerRequest, HandlerResponse};
pub use echo::echo_handler;
pub use error::RouterError;
pub use router::{RouteGroup, RouteMatch, Router};
