use clinic_core::SiteConfig;
use clinic_web::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the clinic site
///
/// Resolves configuration once, loads the catalog and site content, then serves the website and
/// the JSON catalog API on one address.
///
/// # Environment Variables
/// - `CLINIC_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CLINIC_CATALOG_PATH`: Catalog file override (default: `data/catalog.yaml` if present,
///   else the built-in catalog)
/// - `CLINIC_SITE_PATH`: Site content file override (same lookup for `data/site.yaml`)
/// - `CLINIC_STATIC_DIR`: Static asset directory (default: "static")
/// - `CLINIC_SITE_NAME`: Site name (default: "Art of the Possible")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, data loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_run=info".parse()?)
                .add_directive("clinic_core=info".parse()?)
                .add_directive("clinic_web=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SiteConfig::from_lookup(|key| std::env::var(key).ok())?;
    tracing::info!("++ Starting clinic site on {}", config.bind_addr());

    let state = AppState::load(config)?;
    tracing::info!(
        procedures = state.catalog.procedures().len(),
        categories = state.catalog.categories().len(),
        "catalog ready"
    );

    clinic_web::serve(state).await
}
