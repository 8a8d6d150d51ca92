//! route-reverse
//!
//! Loads a route table from TOML, then dumps it, checks it, or resolves a
//! named route.
//!
//! ```text
//! routes.toml
//!     → config::load_config (parse + validate)
//!     → RouteTable::from_config
//!     → finalize (every route bound, paths composed once)
//!     → list | check | resolve <name>
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use route_reverse::config::load_config;
use route_reverse::observability::init_logging;
use route_reverse::{RequestContext, RouteTable};

#[derive(Parser)]
#[command(name = "route-reverse")]
#[command(about = "Inspect a route table and resolve named routes", long_about = None)]
struct Cli {
    /// Route table file.
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every named route with its full path template
    List,
    /// Validate the route table
    Check,
    /// Resolve a named route into a URL
    Resolve {
        name: String,

        /// Parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,

        /// Request host, for request-derived base URLs
        #[arg(long)]
        host: Option<String>,

        /// Request scheme, for request-derived base URLs
        #[arg(long)]
        scheme: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability)?;

    tracing::info!(
        path = ?cli.config,
        base_url = %config.base_url,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    let table = RouteTable::from_config(&config.routes)?;
    let resolver = table.finalize(config.base())?;

    match cli.command {
        Commands::List => {
            let routes = resolver.list_all()?;
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Commands::Check => {
            println!(
                "ok: {} named routes, {} nodes",
                resolver.registry().len(),
                table.snapshot().len()
            );
        }
        Commands::Resolve {
            name,
            params,
            host,
            scheme,
        } => {
            let params: Value = serde_json::from_str(&params)?;
            let ctx = request_context(config.base_from_request, host, scheme);
            println!("{}", resolver.resolve(&name, &params, ctx.as_ref())?);
        }
    }

    Ok(())
}

/// Request context for `resolve`, or `None` when the base URL is fixed.
fn request_context(
    base_from_request: bool,
    host: Option<String>,
    scheme: Option<String>,
) -> Option<RequestContext> {
    if host.is_none() && scheme.is_none() {
        return None;
    }
    if !base_from_request {
        tracing::warn!("--host/--scheme ignored: base_from_request is off");
        return None;
    }

    let mut ctx = RequestContext::new();
    ctx.host = host;
    ctx.scheme = scheme;
    Some(ctx)
}
