//! Request handlers for the dashboard API

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::AppState;
use crate::upstream::{Quote, UpstreamError};

/// Cache key for the weather response
pub const WEATHER_KEY: &str = "weather";

/// Cache key for the background image response
pub const BACKGROUND_IMAGE_KEY: &str = "background-image";

/// Error body returned for failed proxy requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of a proxied resource
///
/// The display message is the fixed text sent to clients; the upstream cause
/// is only logged.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Error retrieving location and weather information")]
    Weather(#[source] UpstreamError),

    #[error("Error retrieving background image")]
    BackgroundImage(#[source] UpstreamError),
}

impl ProxyError {
    fn cause(&self) -> &UpstreamError {
        match self {
            ProxyError::Weather(e) | ProxyError::BackgroundImage(e) => e,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.cause(), "{}", self);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub(super) async fn quote(State(state): State<Arc<AppState>>) -> Json<Quote> {
    Json(state.quotes.pick_random())
}

pub(super) async fn weather(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ProxyError> {
    let body = cached_or_fetch(&state, WEATHER_KEY, || state.weather.fetch())
        .await
        .map_err(ProxyError::Weather)?;
    Ok(Json(body))
}

pub(super) async fn background_image(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ProxyError> {
    let body = cached_or_fetch(&state, BACKGROUND_IMAGE_KEY, || state.images.fetch())
        .await
        .map_err(ProxyError::BackgroundImage)?;
    Ok(Json(body))
}

/// Serves `key` from the cache, or fetches and caches it on a miss
///
/// Failures are returned untouched and leave the cache as it was. Concurrent
/// misses each fetch; the last one to finish is what stays cached.
async fn cached_or_fetch<T, F, Fut>(
    state: &AppState,
    key: &str,
    fetch: F,
) -> Result<Value, UpstreamError>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    if let Some(hit) = state.cache.get(key) {
        tracing::debug!(key, "cache hit");
        return Ok(hit);
    }

    tracing::debug!(key, "cache miss, fetching upstream");
    let result = fetch().await?;
    let body = serde_json::to_value(&result)?;
    state.cache.set(key, body.clone(), state.cache_ttl);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::DashboardServer;
    use crate::upstream::{
        BackgroundImage, CurrentConditions, ImageSource, QuoteSource, WeatherResult,
        WeatherSource,
    };
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Weather source that counts calls and fails on demand
    struct FakeWeather {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeWeather {
        fn working() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl WeatherSource for FakeWeather {
        async fn fetch(&self) -> Result<WeatherResult, UpstreamError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(UpstreamError::Provider("geolocation unavailable".to_string()));
            }
            Ok(WeatherResult {
                location: "Vancouver, British Columbia".to_string(),
                weather: CurrentConditions {
                    temp: 280.0 + call as f64,
                    condition_type: "Clouds".to_string(),
                },
            })
        }
    }

    /// Image source that returns a fixed photo or a parse failure
    struct FakeImages {
        calls: AtomicUsize,
        malformed: bool,
    }

    impl FakeImages {
        fn new(malformed: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                malformed,
            })
        }
    }

    #[async_trait]
    impl ImageSource for FakeImages {
        async fn fetch(&self) -> Result<BackgroundImage, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.malformed {
                let err = serde_json::from_str::<Value>("{ not json").unwrap_err();
                return Err(UpstreamError::ParseError(err));
            }
            Ok(BackgroundImage {
                image_url: "https://images.example/1.jpg".to_string(),
                creator_name: "Joe Example".to_string(),
                creator_url: "https://unsplash.com/@exampleuser".to_string(),
            })
        }
    }

    fn create_state(
        weather: Arc<FakeWeather>,
        images: Arc<FakeImages>,
        ttl: Duration,
    ) -> Arc<AppState> {
        crate::logging::init_test();
        let quotes = QuoteSource::new(vec![Quote {
            text: "Well begun is half done.".to_string(),
            author: "Aristotle".to_string(),
        }])
        .unwrap();
        Arc::new(AppState::new(quotes, weather, images, ttl))
    }

    async fn get(state: &Arc<AppState>, public_dir: &Path, uri: &str) -> (StatusCode, Vec<u8>) {
        let app = DashboardServer::router(Arc::clone(state), public_dir);
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        let temp_dir = TempDir::new().unwrap();
        let (status, bytes) = get(state, temp_dir.path(), uri).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let state = create_state(FakeWeather::working(), FakeImages::new(false), Duration::from_secs(60));
        let (status, body) = get_json(&state, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_quote_endpoint_returns_bare_quote() {
        let state = create_state(FakeWeather::working(), FakeImages::new(false), Duration::from_secs(60));
        let (status, body) = get_json(&state, "/quote").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Well begun is half done.");
        assert_eq!(body["author"], "Aristotle");
        assert!(body.get("data").is_none());
        assert!(state.cache.is_empty(), "Quotes are never cached");
    }

    #[tokio::test]
    async fn test_weather_second_call_is_served_from_cache() {
        let weather = FakeWeather::working();
        let state = create_state(weather.clone(), FakeImages::new(false), Duration::from_secs(60));

        let (status, first) = get_json(&state, "/weather").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["location"], "Vancouver, British Columbia");
        assert_eq!(first["weather"]["temp"], 281.0);
        assert_eq!(first["weather"]["type"], "Clouds");

        let (status, second) = get_json(&state, "/weather").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second, first);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_weather_refetches_after_ttl() {
        let weather = FakeWeather::working();
        let state = create_state(weather.clone(), FakeImages::new(false), Duration::ZERO);

        let (_, first) = get_json(&state, "/weather").await;
        let (_, second) = get_json(&state, "/weather").await;

        assert_eq!(weather.calls.load(Ordering::SeqCst), 2);
        assert_ne!(first["weather"]["temp"], second["weather"]["temp"]);
    }

    #[tokio::test]
    async fn test_weather_failure_returns_400_and_caches_nothing() {
        let weather = FakeWeather::failing();
        let state = create_state(weather.clone(), FakeImages::new(false), Duration::from_secs(60));

        let (status, body) = get_json(&state, "/weather").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({ "error": "Error retrieving location and weather information" })
        );
        assert!(state.cache.get(WEATHER_KEY).is_none());

        // Nothing was cached, so the next request tries again
        let _ = get_json(&state, "/weather").await;
        assert_eq!(weather.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_background_image_success_and_cache() {
        let images = FakeImages::new(false);
        let state = create_state(FakeWeather::working(), images.clone(), Duration::from_secs(60));

        let (status, body) = get_json(&state, "/background-image").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imageUrl"], "https://images.example/1.jpg");
        assert_eq!(body["creatorName"], "Joe Example");
        assert_eq!(body["creatorUrl"], "https://unsplash.com/@exampleuser");

        let _ = get_json(&state, "/background-image").await;
        assert_eq!(images.calls.load(Ordering::SeqCst), 1);
        assert!(state.cache.get(BACKGROUND_IMAGE_KEY).is_some());
        assert!(state.cache.get(WEATHER_KEY).is_none());
    }

    #[tokio::test]
    async fn test_background_image_malformed_payload() {
        let state = create_state(FakeWeather::working(), FakeImages::new(true), Duration::from_secs(60));

        let (status, body) = get_json(&state, "/background-image").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Error retrieving background image" }));
        assert!(state.cache.get(BACKGROUND_IMAGE_KEY).is_none());
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_fetch() {
        let weather = FakeWeather::working();
        let state = create_state(weather.clone(), FakeImages::new(false), Duration::from_secs(60));

        let slow_fetch = |temp: f64, delay_ms: u64| {
            move || async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok::<_, UpstreamError>(serde_json::json!({ "temp": temp }))
            }
        };

        let (a, b) = tokio::join!(
            cached_or_fetch(&state, WEATHER_KEY, slow_fetch(1.0, 10)),
            cached_or_fetch(&state, WEATHER_KEY, slow_fetch(2.0, 50)),
        );

        assert_eq!(a.unwrap()["temp"], 1.0);
        assert_eq!(b.unwrap()["temp"], 2.0);
        // The slower fetch landed last and won
        assert_eq!(state.cache.get(WEATHER_KEY).unwrap()["temp"], 2.0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_through_router() {
        let weather = FakeWeather::working();
        let state = create_state(weather.clone(), FakeImages::new(false), Duration::from_secs(60));

        let (first, second) = tokio::join!(
            get_json(&state, "/weather"),
            get_json(&state, "/weather"),
        );

        assert_eq!(first.0, StatusCode::OK);
        assert_eq!(second.0, StatusCode::OK);
        let calls = weather.calls.load(Ordering::SeqCst);
        assert!((1..=2).contains(&calls));
        assert!(state.cache.get(WEATHER_KEY).is_some());
    }

    #[tokio::test]
    async fn test_root_serves_index_html() {
        let state = create_state(FakeWeather::working(), FakeImages::new(false), Duration::from_secs(60));
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.html"), "<h1>Start page</h1>").unwrap();
        fs::write(temp_dir.path().join("style.css"), "body { margin: 0; }").unwrap();

        let (status, body) = get(&state, temp_dir.path(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>Start page</h1>");

        let (status, body) = get(&state, temp_dir.path(), "/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"body { margin: 0; }");

        let (status, _) = get(&state, temp_dir.path(), "/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
