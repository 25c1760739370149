//! HTTP server for the start page
//!
//! Exposes the dashboard's data sources over a small REST surface and serves
//! the static front-end.
//!
//! # Routes
//!
//! - `GET /quote` - A random quote
//! - `GET /weather` - Current weather near the caller (cached)
//! - `GET /background-image` - A background photo with attribution (cached)
//! - `GET /health` - Liveness check
//! - anything else - Static files from the public directory, `/` being `index.html`

mod routes;

pub use routes::{ErrorResponse, ProxyError, BACKGROUND_IMAGE_KEY, WEATHER_KEY};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cache::TtlCache;
use crate::config::ServerConfig;
use crate::upstream::{ImageClient, ImageSource, QuoteSource, WeatherClient, WeatherSource};

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bind error: {0}")]
    Bind(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Shared server state
///
/// Created once at startup and shared by every request handler. The cache is
/// the only mutable part.
pub struct AppState {
    /// Upstream responses keyed by resource, stored as the JSON sent to clients
    pub cache: TtlCache<Value>,
    pub cache_ttl: Duration,
    pub quotes: QuoteSource,
    pub weather: Arc<dyn WeatherSource>,
    pub images: Arc<dyn ImageSource>,
}

impl AppState {
    /// Creates state with an empty cache
    pub fn new(
        quotes: QuoteSource,
        weather: Arc<dyn WeatherSource>,
        images: Arc<dyn ImageSource>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            cache: TtlCache::new(),
            cache_ttl,
            quotes,
            weather,
            images,
        }
    }

    /// Builds the real provider clients from configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let weather = WeatherClient::new(
            client.clone(),
            config.keys.geolocation.clone(),
            config.keys.weather.clone(),
        )
        .with_geolocation_base_url(config.endpoints.geolocation.clone())
        .with_weather_base_url(config.endpoints.weather.clone());

        let images = ImageClient::new(
            client,
            config.keys.image.clone(),
            config.keys.image_collection.clone(),
        )
        .with_base_url(config.endpoints.image.clone());

        Ok(Self::new(
            config.quotes.clone(),
            Arc::new(weather),
            Arc::new(images),
            config.cache_ttl,
        ))
    }
}

/// HTTP server for the start page
pub struct DashboardServer {
    state: Arc<AppState>,
    public_dir: PathBuf,
}

impl DashboardServer {
    pub fn new(state: AppState, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            state: Arc::new(state),
            public_dir: public_dir.into(),
        }
    }

    /// Build the router: API routes first, static files as the fallback
    pub fn router(state: Arc<AppState>, public_dir: &Path) -> Router {
        Router::new()
            .route("/quote", get(routes::quote))
            .route("/weather", get(routes::weather))
            .route("/background-image", get(routes::background_image))
            .route("/health", get(routes::health))
            .fallback_service(ServeDir::new(public_dir))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the server on the given address until Ctrl-C
    pub async fn run(self, addr: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!(
            addr = addr,
            public_dir = %self.public_dir.display(),
            cache_ttl_secs = self.state.cache_ttl.as_secs(),
            "Dashboard server listening"
        );

        axum::serve(listener, Self::router(self.state, &self.public_dir))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Io)
    }

    /// Get a reference to the shared state (for testing)
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
