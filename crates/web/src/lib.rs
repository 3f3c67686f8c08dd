//! # Clinic Web
//!
//! HTTP surface for the clinic website.
//!
//! Handles:
//! - Server-rendered HTML pages with askama templates
//! - The JSON catalog API with OpenAPI/Swagger documentation
//! - HTTP-specific concerns (redirects, status codes, CORS, request tracing, static assets)
//!
//! Uses `clinic-core` for everything the pages and API actually show.

#![warn(rust_2018_idioms)]

pub mod api;
mod error;
mod html;
mod views;

pub use error::WebError;

use axum::{routing::get, routing::post, Router};
use clinic_core::{Catalog, CatalogResult, SiteConfig, SiteContent};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared by every handler.
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub catalog: Arc<Catalog>,
    pub site: Arc<SiteContent>,
}

impl AppState {
    pub fn new(config: SiteConfig, catalog: Catalog, site: SiteContent) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            site: Arc::new(site),
        }
    }

    /// Load the catalog and site content named by `config`, falling back to the built-in copies.
    ///
    /// # Errors
    ///
    /// Returns the loader error when a data file exists but cannot be read or parsed.
    pub fn load(config: SiteConfig) -> CatalogResult<Self> {
        let catalog = Catalog::load_or_builtin(config.catalog_path())?;
        for report in catalog.content_reports() {
            tracing::warn!(
                procedure = %report.slug,
                issues = report.issues.len(),
                "procedure content partially unreadable"
            );
        }
        let site = SiteContent::load_or_builtin(config.site_path())?;
        Ok(Self::new(config, catalog, site))
    }
}

/// Build the full application router.
pub fn app_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(state.config.static_dir());

    Router::new()
        .route("/", get(html::home))
        .route("/about", get(html::about))
        .route("/results", get(html::results))
        .route("/catalog", get(html::catalog))
        .route("/catalog/:slug", get(html::procedure))
        .route("/health", get(api::health))
        .route("/api/catalog", get(api::catalog_state))
        .route("/api/catalog/transition", post(api::transition))
        .route("/api/procedures/:slug/content", get(api::procedure_content))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .nest_service("/static", static_dir)
        .fallback(html::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_addr().to_owned();
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("++ Serving clinic site on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
