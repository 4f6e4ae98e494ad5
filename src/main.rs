//! mc-inspect API entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mc_inspect_api::api::{create_router, AppState};
use mc_inspect_api::config::Config;
use mc_inspect_api::metrics;
use mc_inspect_api::profile::{MojangClient, PlayerResponse};
use mc_inspect_api::utils::shutdown_signal;

/// Origin-gated proxy for Minecraft player profile lookups.
#[derive(Parser, Debug)]
#[command(name = "mc-inspect-api")]
#[command(about = "Origin-gated proxy for Minecraft player profile lookups")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Resolve one player through the upstream pipeline and print the payload.
    Lookup {
        /// Player name.
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Read .env before the log filter so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("mc_inspect_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Lookup { name }) => cmd_lookup(&name).await,
        None => cmd_serve(args.port).await,
    }
}

/// Load and validate configuration, logging failures.
fn load_config() -> mc_inspect_api::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("{}", e);
        return Err(e);
    }

    Ok(config)
}

/// Bind the listener and serve until a shutdown signal arrives.
async fn run_server(addr: SocketAddr, app_state: AppState) -> mc_inspect_api::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve a player against the configured upstreams.
async fn resolve_player(config: &Config, name: &str) -> mc_inspect_api::Result<PlayerResponse> {
    let client = MojangClient::new(config)?;
    let player = client.lookup_player(name).await?;
    Ok(player)
}

/// Run the HTTP service until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    let ip = config.bind_ip()?;

    info!("Allowed origins: {}", config.allowed_origins.join(", "));
    info!("Name lookup upstream: {}", config.mojang_api_url);
    info!("Profile upstream: {}", config.session_server_url);

    if config.metrics_enabled {
        metrics::install_exporter(SocketAddr::new(ip, config.metrics_port))?;
    }
    // Descriptions only reach a recorder installed before this call
    metrics::init_metrics();

    let addr = SocketAddr::new(ip, config.port);
    let app_state = AppState::new(config)?;
    run_server(addr, app_state).await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("MC-INSPECT API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Allowed Origins:");
    for origin in &config.allowed_origins {
        println!("    - {}", origin);
    }
    println!("  Name Lookup URL: {}", config.mojang_api_url);
    println!("  Profile URL: {}", config.session_server_url);
    println!("  Listen: {}:{}", config.bind_address, config.port);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled {
            format!("Enabled (port {})", config.metrics_port)
        } else {
            "Disabled".to_string()
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Resolve a single player and print the JSON payload.
async fn cmd_lookup(name: &str) -> anyhow::Result<()> {
    let config = load_config()?;

    match resolve_player(&config, name).await {
        Ok(player) => {
            println!("{}", serde_json::to_string_pretty(&player)?);
            Ok(())
        }
        Err(e) => {
            error!("Lookup failed: {}", e);
            Err(e.into())
        }
    }
}
