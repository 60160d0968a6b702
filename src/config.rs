//! # Configuration Module
//!
//! Declarative router configuration loaded from YAML or JSON, with
//! environment variable overrides.
//!
//! ## File format
//!
//! ```yaml
//! router_prefix: /api
//! welcome_message: nothing registered yet
//! routes:
//!   - method: GET
//!     path: /health
//! groups:
//!   - prefix: /admin
//!     routes:
//!       - { method: GET, path: /users/{id} }
//!     groups:
//!       - prefix: /reports
//!         routes:
//!           - { method: GET, path: "/{year:\\d{4}}" }
//! ```
//!
//! Top-level `routes` are registered before `groups`; inside a group, its
//! `routes` come before its nested `groups`. Registration order is match
//! order.
//!
//! ## Environment Variables
//!
//! - `FNROUTER_PREFIX`: overrides `router_prefix`
//! - `FNROUTER_WELCOME_MESSAGE`: overrides `welcome_message`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::dispatcher::{Handler, HandlerResponse};
use crate::error::RouterError;
use crate::router::{RouteGroup, Router};

/// Router configuration and declarative route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Global prefix applied to every route
    pub router_prefix: Option<String>,
    /// Message returned when no routes are registered
    pub welcome_message: Option<String>,
    /// Routes registered at the top level
    pub routes: Vec<RouteSpec>,
    /// Prefix groups, registered after `routes`
    pub groups: Vec<GroupSpec>,
}

/// One declared route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    pub method: String,
    pub path: String,
}

/// A prefix group with its own routes and nested groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    pub prefix: String,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

impl RouterConfig {
    /// Load a configuration file. `.json` files are parsed as JSON, anything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RouterConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config {}", path.display()))?
        };
        info!(
            path = %path.display(),
            routes_count = config.route_count(),
            "Router configuration loaded"
        );
        Ok(config)
    }

    /// Configuration from environment variables only (no routes).
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `FNROUTER_PREFIX` and `FNROUTER_WELCOME_MESSAGE` when set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(prefix) = env::var("FNROUTER_PREFIX") {
            self.router_prefix = Some(prefix);
        }
        if let Ok(message) = env::var("FNROUTER_WELCOME_MESSAGE") {
            self.welcome_message = Some(message);
        }
        self
    }

    /// Total number of declared routes, groups included.
    #[must_use]
    pub fn route_count(&self) -> usize {
        fn count(group: &GroupSpec) -> usize {
            group.routes.len() + group.groups.iter().map(count).sum::<usize>()
        }
        self.routes.len() + self.groups.iter().map(count).sum::<usize>()
    }

    /// The welcome response to use instead of the built-in one, if configured.
    #[must_use]
    pub fn welcome_response(&self) -> Option<HandlerResponse> {
        self.welcome_message.as_ref().map(|message| {
            HandlerResponse::json(
                200,
                serde_json::json!({ "message": message, "routes": 0 }),
            )
        })
    }

    /// Build a router from this configuration.
    ///
    /// `handler_for` is called once per declared route, in registration order.
    ///
    /// # Errors
    ///
    /// Any registration error ([`RouterError::InvalidMethod`],
    /// [`RouterError::InvalidPattern`]).
    pub fn build_router<F>(&self, mut handler_for: F) -> Result<Router, RouterError>
    where
        F: FnMut(&RouteSpec) -> Arc<dyn Handler>,
    {
        let mut router = Router::new();
        if let Some(prefix) = &self.router_prefix {
            router.set_router_prefix(prefix)?;
        }
        for route in &self.routes {
            router.add_shared_route(&route.method, &route.path, handler_for(route))?;
        }
        for group in &self.groups {
            router.group(&group.prefix, |g| register_group(g, group, &mut handler_for))?;
        }
        Ok(router)
    }
}

fn register_group(
    group: &mut RouteGroup<'_>,
    spec: &GroupSpec,
    handler_for: &mut dyn FnMut(&RouteSpec) -> Arc<dyn Handler>,
) -> Result<(), RouterError> {
    for route in &spec.routes {
        group.add_shared_route(&route.method, &route.path, handler_for(route))?;
    }
    for nested in &spec.groups {
        group.group(&nested.prefix, |g| register_group(g, nested, &mut *handler_for))?;
    }
    Ok(())
}
