//! Geolocation and weather API clients
//!
//! Resolving the current weather takes two provider calls: ipstack turns the
//! caller's IP into a location, then OpenWeatherMap reports the conditions at
//! that location's coordinates. Either failure fails the whole fetch.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, CurrentConditions, UpstreamError, WeatherResult, WeatherSource};

/// Base URL for the ipstack geolocation API
pub const IPSTACK_BASE_URL: &str = "http://api.ipstack.com";

/// Base URL for the OpenWeatherMap API
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// Approximate location of the caller, as resolved by the geolocation provider
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Display name such as "Vancouver, British Columbia"
    ///
    /// Falls back to whichever of city or region is present.
    pub fn display_name(&self) -> String {
        match (self.city.is_empty(), self.region.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.region),
            (false, true) => self.city.clone(),
            (true, false) => self.region.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Client for fetching the current weather near the caller
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    geolocation_key: String,
    weather_key: String,
    geolocation_base_url: String,
    weather_base_url: String,
}

impl WeatherClient {
    /// Create a new WeatherClient against the public provider endpoints
    pub fn new(
        client: Client,
        geolocation_key: impl Into<String>,
        weather_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            geolocation_key: geolocation_key.into(),
            weather_key: weather_key.into(),
            geolocation_base_url: IPSTACK_BASE_URL.to_string(),
            weather_base_url: OPENWEATHER_BASE_URL.to_string(),
        }
    }

    /// Point the geolocation calls at a different base URL
    pub fn with_geolocation_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.geolocation_base_url = base_url.into();
        self
    }

    /// Point the weather calls at a different base URL
    pub fn with_weather_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.weather_base_url = base_url.into();
        self
    }

    /// Resolve the caller's approximate location
    ///
    /// # Returns
    /// * `Ok(Location)` - City, region and coordinates
    /// * `Err(UpstreamError)` - If the request fails or the payload is unusable
    pub async fn fetch_location(&self) -> Result<Location, UpstreamError> {
        let url = format!("{}/check", self.geolocation_base_url.trim_end_matches('/'));
        let request = self
            .client
            .get(&url)
            .query(&[("access_key", self.geolocation_key.as_str())]);

        let api_response: IpstackResponse = get_json(request).await?;
        parse_location(api_response)
    }

    /// Fetch current conditions for the given coordinates
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    pub async fn fetch_conditions(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, UpstreamError> {
        let url = format!(
            "{}/data/2.5/weather",
            self.weather_base_url.trim_end_matches('/')
        );
        let request = self.client.get(&url).query(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", self.weather_key.clone()),
        ]);

        let api_response: OpenWeatherResponse = get_json(request).await?;
        parse_conditions(api_response)
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn fetch(&self) -> Result<WeatherResult, UpstreamError> {
        let location = self.fetch_location().await?;
        tracing::debug!(
            city = %location.city,
            region = %location.region,
            "resolved caller location"
        );

        let conditions = self
            .fetch_conditions(location.latitude, location.longitude)
            .await?;

        Ok(WeatherResult {
            location: location.display_name(),
            weather: conditions,
        })
    }
}

/// Turn an ipstack payload into a Location
fn parse_location(response: IpstackResponse) -> Result<Location, UpstreamError> {
    // ipstack reports bad keys and quota problems with a 200 and an error object
    if let Some(error) = response.error {
        return Err(UpstreamError::Provider(
            error.info.unwrap_or_else(|| "unknown geolocation error".to_string()),
        ));
    }
    if response.success == Some(false) {
        return Err(UpstreamError::Provider("geolocation lookup failed".to_string()));
    }

    let latitude = response
        .latitude
        .ok_or_else(|| UpstreamError::MissingField("latitude".to_string()))?;
    let longitude = response
        .longitude
        .ok_or_else(|| UpstreamError::MissingField("longitude".to_string()))?;

    Ok(Location {
        city: response.city.unwrap_or_default(),
        region: response.region_name.unwrap_or_default(),
        latitude,
        longitude,
    })
}

/// Turn an OpenWeatherMap payload into current conditions
fn parse_conditions(response: OpenWeatherResponse) -> Result<CurrentConditions, UpstreamError> {
    let condition_type = response
        .weather
        .into_iter()
        .next()
        .map(|w| w.main)
        .ok_or_else(|| UpstreamError::MissingField("weather".to_string()))?;

    Ok(CurrentConditions {
        temp: response.main.temp,
        condition_type,
    })
}

/// ipstack `/check` response structure
#[derive(Debug, Deserialize)]
struct IpstackResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<IpstackError>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    region_name: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

/// Error object embedded in a failed ipstack response
#[derive(Debug, Deserialize)]
struct IpstackError {
    #[serde(default)]
    info: Option<String>,
}

/// OpenWeatherMap current weather response structure
#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    main: OpenWeatherMain,
    weather: Vec<OpenWeatherCondition>,
}

/// Temperature block from OpenWeatherMap (Kelvin unless units are requested)
#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
}

/// One condition entry from OpenWeatherMap
#[derive(Debug, Deserialize)]
struct OpenWeatherCondition {
    main: String,
}
