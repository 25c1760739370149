//! HTTP client for a running dashboard server
//!
//! Mirrors what the browser widget does on page load: request the quote,
//! weather and background image and push each result into the model.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::model::{DashboardModel, Topic};
use crate::upstream::{BackgroundImage, Quote, WeatherResult};

/// Errors that can occur when talking to the dashboard server
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with an error body
    #[error("Server returned {status}: {message}")]
    Server { status: StatusCode, message: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// `{ "error": ... }` body returned by the proxy endpoints
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the dashboard's own REST endpoints
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub async fn quote(&self) -> Result<Quote, ClientError> {
        self.get("/quote").await
    }

    pub async fn weather(&self) -> Result<WeatherResult, ClientError> {
        self.get("/weather").await
    }

    pub async fn background_image(&self) -> Result<BackgroundImage, ClientError> {
        self.get("/background-image").await
    }

    /// Fetches all three resources concurrently and applies what succeeded
    ///
    /// # Returns
    /// The topics that could not be refreshed, with their errors. An empty
    /// vector means the model is fully up to date.
    pub async fn refresh(&self, model: &mut DashboardModel) -> Vec<(Topic, ClientError)> {
        let (quote, weather, image) =
            futures::join!(self.quote(), self.weather(), self.background_image());

        let mut failures = Vec::new();
        match quote {
            Ok(quote) => model.update_quote(quote),
            Err(e) => failures.push((Topic::Quote, e)),
        }
        match weather {
            Ok(weather) => model.update_weather(weather),
            Err(e) => failures.push((Topic::Weather, e)),
        }
        match image {
            Ok(image) => model.update_background_image(image),
            Err(e) => failures.push((Topic::BackgroundImage, e)),
        }
        failures
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ClientError::Server { status, message });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
