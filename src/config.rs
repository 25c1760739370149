//! Startup configuration for the dashboard server
//!
//! Turns parsed `serve` arguments (flags or environment variables) into a
//! validated `ServerConfig`. Anything wrong here is fatal at startup; request
//! handling never sees a half-configured server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cli::ServeArgs;
use crate::upstream::QuoteSource;

/// Error types for server configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider API key was not supplied
    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    /// The quote list contained no quotes
    #[error("Quote list is empty")]
    EmptyQuoteList,

    /// The quote file could not be read
    #[error("Failed to read quote file {path}: {source}")]
    QuoteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The quote file is not a JSON array of quotes
    #[error("Failed to parse quote list: {0}")]
    QuoteParse(#[source] serde_json::Error),

    /// Host and port do not form a socket address
    #[error("Invalid listen address: '{0}'")]
    InvalidAddress(String),
}

/// API keys for the third-party providers
#[derive(Debug, Clone)]
pub struct ProviderKeys {
    /// ipstack access key
    pub geolocation: String,
    /// OpenWeatherMap app id
    pub weather: String,
    /// Unsplash access key
    pub image: String,
    /// Unsplash collection to draw backgrounds from
    pub image_collection: String,
}

/// Base URLs for the third-party providers
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub geolocation: String,
    pub weather: String,
    pub image: String,
}

/// Fully validated configuration for `startpage serve`
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Directory of static assets served at `/`
    pub public_dir: PathBuf,
    /// How long proxied resources stay cached
    pub cache_ttl: Duration,
    /// Quotes served by `/quote`
    pub quotes: QuoteSource,
    pub keys: ProviderKeys,
    pub endpoints: ProviderEndpoints,
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed `serve` arguments.
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` when every key is present and the quote list loads
    /// * `Err(ConfigError)` describing the first problem found
    pub fn from_args(args: &ServeArgs) -> Result<Self, ConfigError> {
        let addr_str = format!("{}:{}", args.host, args.port);
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(addr_str.clone()))?;

        let keys = ProviderKeys {
            geolocation: require_key(&args.geolocation_key, "IPSTACK_API_KEY")?,
            weather: require_key(&args.weather_key, "OPENWEATHER_API_KEY")?,
            image: require_key(&args.image_key, "UNSPLASH_ACCESS_KEY")?,
            image_collection: require_key(&args.image_collection, "UNSPLASH_COLLECTION_ID")?,
        };

        let quotes = match &args.quotes {
            Some(path) => QuoteSource::from_path(path)?,
            None => QuoteSource::bundled()?,
        };

        Ok(ServerConfig {
            addr,
            public_dir: args.public_dir.clone(),
            cache_ttl: Duration::from_secs(args.cache_ttl),
            quotes,
            keys,
            endpoints: ProviderEndpoints {
                geolocation: args.geolocation_url.clone(),
                weather: args.weather_url.clone(),
                image: args.image_url.clone(),
            },
        })
    }
}

/// Treats absent and blank values alike
fn require_key(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(ConfigError::MissingApiKey(name)),
    }
}
