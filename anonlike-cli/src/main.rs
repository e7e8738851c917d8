//! anonlike CLI - runs the CAPTCHA-gated anonymous like endpoint
//!
//! Configuration comes from the environment (or a `.env` file):
//! - `SUPABASE_DB_URL` (required; `DATABASE_URL` accepted)
//! - `CLOUDFLARE_SECRET_KEY`
//! - `LIKE_RESPONSE_STYLE` (`machine` or `human`)
//! - `TURNSTILE_VERIFY_URL`

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "anonlike",
    author,
    version,
    about = "Anonymous, CAPTCHA-gated strategy likes over HTTP"
)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
