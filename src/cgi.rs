//! CGI request source and response sink.
//!
//! Thin I/O wrappers around the router for a one-request-per-process model:
//! the request method and URI come from the CGI environment, the response is
//! written once to stdout as a CGI response (`Status:` line, headers, blank
//! line, body).

use anyhow::{Context, Result};
use http::StatusCode;
use serde_json::Value;
use std::env;
use std::io::{self, Write};
use tracing::{error, info};

use crate::dispatcher::{Dispatcher, HandlerResponse};
use crate::error::RouterError;
use crate::ids::DispatchId;
use crate::router::Router;

/// Supplies the inputs of a dispatch.
pub trait RequestSource {
    fn request_method(&self) -> String;
    fn request_uri(&self) -> String;

    /// Upstream request id used as the dispatch id, when it parses as a ULID.
    fn request_id(&self) -> Option<String> {
        None
    }
}

/// Request data read from CGI environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgiRequest {
    method: String,
    uri: String,
    request_id: Option<String>,
}

impl CgiRequest {
    #[must_use]
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            request_id: None,
        }
    }

    /// Read `REQUEST_METHOD` and `REQUEST_URI` (default `GET` and `/`).
    ///
    /// Servers that do not set `REQUEST_URI` get it rebuilt from `PATH_INFO`
    /// and `QUERY_STRING`. `HTTP_X_REQUEST_ID` is picked up as request id.
    #[must_use]
    pub fn from_env() -> Self {
        let method = env::var("REQUEST_METHOD").unwrap_or_else(|_| "GET".to_string());
        let uri = env::var("REQUEST_URI").unwrap_or_else(|_| {
            let path = env::var("PATH_INFO").unwrap_or_else(|_| "/".to_string());
            match env::var("QUERY_STRING") {
                Ok(query) if !query.is_empty() => format!("{path}?{query}"),
                _ => path,
            }
        });
        Self {
            method,
            uri,
            request_id: env::var("HTTP_X_REQUEST_ID").ok(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

impl RequestSource for CgiRequest {
    fn request_method(&self) -> String {
        self.method.clone()
    }

    fn request_uri(&self) -> String {
        self.uri.clone()
    }

    fn request_id(&self) -> Option<String> {
        self.request_id.clone()
    }
}

/// Canonical reason phrase for `status`, `Unknown` when there is none.
fn status_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// Write `resp` as a CGI response.
///
/// A `Value::String` body is sent as-is (`text/plain` unless the handler set
/// a content type), anything else as JSON.
///
/// # Errors
///
/// I/O errors from `out`.
pub fn write_response<W: Write>(out: &mut W, resp: &HandlerResponse) -> io::Result<()> {
    write!(out, "Status: {} {}\r\n", resp.status, status_reason(resp.status))?;
    for (name, value) in &resp.headers {
        write!(out, "{name}: {value}\r\n")?;
    }
    match &resp.body {
        Value::String(s) => {
            if resp.get_header("content-type").is_none() {
                out.write_all(b"content-type: text/plain\r\n")?;
            }
            out.write_all(b"\r\n")?;
            out.write_all(s.as_bytes())?;
        }
        other => {
            if resp.get_header("content-type").is_none() {
                out.write_all(b"content-type: application/json\r\n")?;
            }
            out.write_all(b"\r\n")?;
            serde_json::to_writer(&mut *out, other)?;
        }
    }
    out.flush()
}

/// Dispatch the request from `source` against `router` and write the
/// response to `out`.
///
/// `NoRouteMatched` becomes a 404 JSON body and a handler failure a 500; both
/// are logged. Returns the status written.
///
/// # Errors
///
/// Only when writing the response fails.
pub fn serve_once<S, W>(
    router: &Router,
    source: &S,
    out: &mut W,
    welcome: Option<HandlerResponse>,
) -> Result<u16>
where
    S: RequestSource + ?Sized,
    W: Write,
{
    let method = source.request_method();
    let uri = source.request_uri();
    let id = DispatchId::from_header_or_new(source.request_id().as_deref());

    let mut dispatcher = Dispatcher::new(router).with_id(id);
    if let Some(welcome) = welcome {
        dispatcher = dispatcher.with_welcome(welcome);
    }

    let response = match dispatcher.dispatch(&method, &uri) {
        Ok(dispatch) => dispatch
            .into_response()
            .unwrap_or_else(|| HandlerResponse::error(500, "Request already dispatched")),
        Err(RouterError::NoRouteMatched { method, uri }) => HandlerResponse::json(
            404,
            serde_json::json!({
                "error": "Not Found",
                "method": method,
                "path": uri,
            }),
        ),
        Err(RouterError::Handler(e)) => {
            error!(dispatch_id = %id, error = ?e, "Handler error - responding 500");
            HandlerResponse::error(500, "Internal Server Error")
        }
        Err(e) => {
            error!(dispatch_id = %id, error = %e, "Dispatch failed - responding 500");
            HandlerResponse::error(500, &e.to_string())
        }
    };

    write_response(out, &response).context("Failed to write CGI response")?;
    info!(
        dispatch_id = %id,
        method = %method,
        uri = %uri,
        status = response.status,
        "Response written"
    );
    Ok(response.status)
}
