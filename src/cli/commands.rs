use crate::{
    cgi::{serve_once, CgiRequest},
    config::RouterConfig,
    dispatcher::Handler,
    echo::echo_handler,
    router::Router,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line interface for fnrouter
///
/// Every command loads a route file and registers the echo handler for each
/// declared route.
#[derive(Parser)]
#[command(name = "fnrouter")]
#[command(about = "Function-registration HTTP router", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective route table in registration order
    Routes {
        /// Route file (YAML or JSON)
        #[arg(short, long, env = "FNROUTER_ROUTES")]
        routes: PathBuf,
    },
    /// Resolve a request against the route table and print the match as JSON
    Match {
        /// Route file (YAML or JSON)
        #[arg(short, long, env = "FNROUTER_ROUTES")]
        routes: PathBuf,

        /// Request method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request URI, query string allowed
        #[arg(short, long)]
        uri: String,
    },
    /// Serve a single CGI request from the environment with echo handlers
    Cgi {
        /// Route file (YAML or JSON)
        #[arg(short, long, env = "FNROUTER_ROUTES")]
        routes: PathBuf,
    },
}

/// Load a route file (environment overrides applied) and build an echo router.
///
/// # Errors
///
/// Fails if the file cannot be loaded or a route does not register.
pub fn load_echo_router(path: &Path) -> anyhow::Result<(RouterConfig, Router)> {
    let config = RouterConfig::load(path)?.with_env_overrides();
    let router = config
        .build_router(|_| -> Arc<dyn Handler> { Arc::new(echo_handler) })
        .with_context(|| format!("Failed to build router from {}", path.display()))?;
    Ok((config, router))
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The route file cannot be loaded or registered
/// - `match` finds no route
/// - Writing the CGI response fails
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Routes { routes } => {
            let (_config, router) = load_echo_router(routes)?;
            router.dump_routes();
            Ok(())
        }
        Commands::Match {
            routes,
            method,
            uri,
        } => {
            let (_config, router) = load_echo_router(routes)?;
            let matched = router.resolve(method, uri)?;
            let params: Map<String, Value> = matched
                .path_params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                .collect();
            let out = json!({
                "method": matched.route.method().to_string(),
                "route": matched.route.full_path(),
                "path": matched.path,
                "params": params,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Commands::Cgi { routes } => {
            let (config, router) = load_echo_router(routes)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            serve_once(
                &router,
                &CgiRequest::from_env(),
                &mut out,
                config.welcome_response(),
            )?;
            Ok(())
        }
    }
}
