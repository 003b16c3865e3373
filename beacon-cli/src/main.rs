use anyhow::{Context, Result};
use axum::http::HeaderValue;
use beacon::server::{SignalingConfig, SignalingService, router};
use clap::Parser;
use colored::*;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "beacon", about = "Call signaling and presence server", version)]
struct Cli {
    /// Address the HTTP/WebSocket listener binds to.
    #[arg(long, env = "BEACON_BIND", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Seconds an unanswered call request may ring. 0 disables the timeout.
    #[arg(long, env = "BEACON_RING_TIMEOUT_SECS", default_value_t = 30)]
    ring_timeout_secs: u64,

    /// Frontend origin allowed by CORS. Any origin when unset.
    #[arg(long, env = "BEACON_ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}

fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let Some(origin) = allowed_origin else {
        return Ok(cors.allow_origin(Any));
    };
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("Invalid allowed origin: {origin}"))?;

    Ok(cors.allow_origin(origin))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    println!("{}", "📞 Starting Beacon signaling server...".green().bold());

    let config = SignalingConfig::default()
        .with_ring_timeout(Some(Duration::from_secs(cli.ring_timeout_secs)));
    info!(ring_timeout = ?config.ring_timeout, "Signaling configured");

    let service = SignalingService::new(config);
    let app = router(service).layer(cors_layer(cli.allowed_origin.as_deref())?);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    info!("Signaling server listening on http://{}", cli.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
