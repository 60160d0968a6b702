//! # CLI Module
//!
//! Command-line interface for inspecting and serving a declarative route
//! table (see [`config`](crate::config) for the file format).
//!
//! ## Commands
//!
//! ### `routes`
//!
//! ```bash
//! fnrouter routes --routes demos/routes.yaml
//! ```
//!
//! ### `match`
//!
//! ```bash
//! fnrouter match --routes demos/routes.yaml --method GET --uri '/api/users/42?x=1'
//! ```
//!
//! ### `cgi`
//!
//! Reads `REQUEST_METHOD`/`REQUEST_URI` and writes one CGI response to stdout:
//!
//! ```bash
//! REQUEST_METHOD=GET REQUEST_URI=/api/health fnrouter cgi --routes demos/routes.yaml
//! ```
//!
//! `--routes` may also be given through `FNROUTER_ROUTES`. Logs go to stderr.

mod commands;


pub use commands::{load_echo_router, run_cli, Cli, Commands};
