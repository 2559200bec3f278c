//! Kotlin Notebook Cookbook
//!
//! Serves a static catalog of notebooks, renders notebook documents to HTML
//! and exposes the catalog, rendered documents and search over a JSON API.

mod api;
mod config;
mod document;
mod errors;
mod html;
mod models;
mod render;
mod search;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use document::{AssetDirFetcher, DocumentFetcher, DocumentLoader, HttpFetcher};
use models::Catalog;
use search::SearchIndex;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub search: Arc<SearchIndex>,
    pub loader: DocumentLoader,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Kotlin Notebook Cookbook");
    tracing::info!("Assets directory: {:?}", config.assets_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Load catalog
    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!("Catalog path: {:?}", path);
            Catalog::load(path).await?
        }
        None => Catalog::builtin()?,
    };
    tracing::info!(
        "Catalog loaded with {} notebooks and {} topics",
        catalog.notebooks.len(),
        catalog.topics.len()
    );

    // Document source
    let fetcher: Arc<dyn DocumentFetcher> = match &config.assets_url {
        Some(url) => {
            tracing::info!("Fetching notebooks from {}", url);
            Arc::new(HttpFetcher::new(url)?)
        }
        None => Arc::new(AssetDirFetcher::new(&config.assets_dir)),
    };
    let loader = DocumentLoader::new(fetcher).with_timeout(config.fetch_timeout);

    // Build search index from the catalog
    let search = Arc::new(SearchIndex::in_memory()?);
    search.rebuild(&catalog.notebooks).await?;

    // Create application state
    let state = AppState {
        catalog: Arc::new(catalog),
        search,
        loader,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        .route("/catalog", get(api::get_catalog))
        // Notebooks
        .route("/notebooks", get(api::list_notebooks))
        .route("/notebooks/{id}", get(api::get_notebook))
        .route("/notebooks/{id}/document", get(api::get_notebook_document))
        // Topics
        .route("/topics", get(api::list_topics))
        .route("/topics/{id}/notebooks", get(api::list_topic_notebooks))
        // Tags
        .route("/tags", get(api::list_tags))
        // Search
        .route("/search", get(api::search_notebooks));

    // HTML pages
    let page_routes = Router::new()
        .route("/", get(api::index_page))
        .route("/notebook/{id}", get(api::notebook_page));

    // Static assets (notebook files, images)
    let assets = ServeDir::new(state.config.assets_dir.join("assets"));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .nest_service("/assets", assets)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
