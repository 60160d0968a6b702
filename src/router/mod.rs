//! # Router Module
//!
//! The route table: registration, prefix composition and ordered matching.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Storing routes per HTTP method, in registration order
//! - Composing the router prefix and group prefixes with each declared path
//! - Compiling braced path patterns (`/users/{id}`, `/files/{path:.+}`) into
//!   anchored matchers
//! - Resolving a request to the first matching route and its parameters
//!
//! ## Architecture
//!
//! 1. **Registration**: every path is canonicalized with
//!    [`format_path`](crate::path::format_path), prefixed by its group chain,
//!    and compiled together with the router prefix into a
//!    [`CompiledPattern`].
//!
//! 2. **Matching**: for a request, only the bucket of the request method is
//!    scanned, in registration order. The first pattern that matches wins;
//!    there is no specificity ranking.
//!
//! ## Example
//!
//! ```rust
//! use fnrouter::dispatcher::{handler_fn, HandlerResponse};
//! use fnrouter::router::Router;
//!
//! # fn main() -> Result<(), fnrouter::RouterError> {
//! let ok = || handler_fn(|_| Ok(HandlerResponse::text(200, "ok")));
//!
//! let mut router = Router::new();
//! router.set_router_prefix("/api")?;
//! router.group("/admin", |admin| {
//!     admin.get("/users/{id}", ok())?;
//!     Ok(())
//! })?;
//!
//! let m = router.resolve("GET", "/api/admin/users/42?expand=1")?;
//! assert_eq!(m.route.full_path(), "/api/admin/users/{id}");
//! assert_eq!(m.get_path_param("id"), Some("42"));
//! # Ok(())
//! # }
//! ```

/// Generates the fixed-method registration shortcuts.
///
/// Expects the surrounding impl to provide
/// `fn register_method<H: Handler + 'static>(&mut self, Method, &str, H)`.
macro_rules! method_shortcuts {
    () => {
        method_shortcuts!(@one get, GET, "GET");
        method_shortcuts!(@one post, POST, "POST");
        method_shortcuts!(@one put, PUT, "PUT");
        method_shortcuts!(@one patch, PATCH, "PATCH");
        method_shortcuts!(@one delete, DELETE, "DELETE");
    };
    (@one $fn_name:ident, $method:ident, $label:literal) => {
        #[doc = concat!("Register a `", $label, "` route.")]
        ///
        /// # Errors
        ///
        /// [`RouterError::InvalidPattern`] if the path does not compile.
        pub fn $fn_name<H>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError>
        where
            H: Handler + 'static,
        {
            self.register_method(Method::$method, path, handler)
        }
    };
}

mod core;
mod group;
mod pattern;

pub use core::{ParamVec, Route, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use group::RouteGroup;
pub use pattern::CompiledPattern;
