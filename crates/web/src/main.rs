//! Standalone web server binary.
//!
//! ## Purpose
//! Runs the clinic website (HTML pages plus the JSON catalog API) on its own.
//!
//! ## Intended use
//! Useful during development when iterating on templates or the API. The workspace's main
//! `clinic-run` binary serves the same router.

use clinic_core::SiteConfig;
use clinic_web::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the clinic web server.
///
/// # Environment Variables
/// - `CLINIC_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CLINIC_CATALOG_PATH` / `CLINIC_SITE_PATH`: data file overrides
/// - `CLINIC_STATIC_DIR`: static asset directory (default: "static")
/// - `CLINIC_SITE_NAME`: site name shown in page titles
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or data files are invalid, or
/// - the server address cannot be bound or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_web=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SiteConfig::from_lookup(|key| std::env::var(key).ok())?;
    tracing::info!("-- Starting clinic web server on {}", config.bind_addr());

    let state = AppState::load(config)?;
    clinic_web::serve(state).await
}
