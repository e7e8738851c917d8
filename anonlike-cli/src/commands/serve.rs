//! HTTP server command for the anonymous like endpoint
//!
//! Loads configuration, builds the lazy pool and runs until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use anonlike_server::captcha::TurnstileVerifier;
use anonlike_server::config::load_dotenv;
use anonlike_server::db::{create_pool_with_options, PgLikeStore};
use anonlike_server::{run_server, AppState, LikeConfig, ResponseStyle, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "LIKE_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Response encoding: `machine` (codes, always 200) or `human` (messages, 403/404)
    #[arg(long)]
    pub style: Option<ResponseStyle>,

    /// Database URL (overrides SUPABASE_DB_URL / DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Resolve configuration, letting flags win over the environment.
fn resolve_config(args: &ServeArgs) -> Result<LikeConfig> {
    let mut config = LikeConfig::from_lookup(|key| {
        if key == "SUPABASE_DB_URL" {
            if let Some(url) = &args.database_url {
                return Some(url.clone());
            }
        }
        std::env::var(key).ok()
    })
    .context("Set SUPABASE_DB_URL (or DATABASE_URL / --database-url) before serving")?;

    if let Some(style) = args.style {
        config.response_style = style;
    }

    Ok(config)
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    load_dotenv();
    let config = resolve_config(&args)?;

    tracing::info!(
        bind = %args.bind,
        style = %config.response_style,
        pool_size = config.pool_size,
        "Starting anonymous like server"
    );

    let pool = create_pool_with_options(&config.database_url, config.pool_size)
        .context("Invalid database URL")?;

    let state = AppState::new(
        Arc::new(PgLikeStore::new(pool)),
        Arc::new(TurnstileVerifier::from_config(&config)),
        config.response_style,
    );

    let server = ServerConfig {
        bind_addr: args.bind,
    };

    // Run server (blocks until shutdown)
    run_server(state, server).await.context("Server error")?;

    Ok(())
}
