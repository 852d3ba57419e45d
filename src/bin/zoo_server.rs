// Zoo guide server entry point
//
// Usage: cargo run --bin zoo_server -- --data-dir data --static-dir static

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zoo_guide::{create_router, AppState, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("zoo_guide={},tower_http=debug,axum=debug,warn", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting zoo guide server...");
    tracing::info!("Configuration:");
    tracing::info!("  DATA_DIR: {}", args.data_dir.display());
    tracing::info!("  STATIC_DIR: {}", args.static_dir.display());
    tracing::info!("  CACHE_TTL_SECS: {}", args.cache_ttl_secs);
    tracing::info!("  CACHE_IDLE_SECS: {}", args.cache_idle_secs);
    tracing::info!("  WARM_CACHE: {}", args.warm_cache);

    let state = AppState::new(&args.settings()).await?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!("Server listening on {}", args.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
