//! Upstream data sources for the dashboard
//!
//! This module contains the clients that talk to third-party providers (IP
//! geolocation, current weather, image search) and the local quote list, plus
//! the result records each of them is normalized into.

pub mod images;
pub mod quotes;
pub mod weather;

pub use images::ImageClient;
pub use quotes::QuoteSource;
pub use weather::{Location, WeatherClient};

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reaching a third-party provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Provider returned status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Provider reported an error inside an otherwise successful response
    #[error("Provider reported an error: {0}")]
    Provider(String),
}

/// A quote shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The quote itself
    pub text: String,
    /// Who said it
    pub author: String,
}

/// Current weather at the caller's approximate location
///
/// Serializes as `{ "location": ..., "weather": { "temp": ..., "type": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Human-readable place name, e.g. "Vancouver, British Columbia"
    pub location: String,
    /// Conditions at that place
    pub weather: CurrentConditions,
}

/// Temperature and condition type reported by the weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Kelvin
    pub temp: f64,
    /// Provider condition group, e.g. "Clouds" or "Rain"
    #[serde(rename = "type")]
    pub condition_type: String,
}

/// A background image and its attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundImage {
    /// Direct URL of the image
    pub image_url: String,
    /// Photographer's display name
    pub creator_name: String,
    /// Photographer's profile page
    pub creator_url: String,
}

/// Anything that can produce the current weather
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self) -> Result<WeatherResult, UpstreamError>;
}

/// Anything that can produce a background image
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self) -> Result<BackgroundImage, UpstreamError>;
}

/// Sends a request once and decodes a successful JSON body
///
/// Non-2xx responses become `UpstreamError::Status`. No retry is attempted.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status));
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
