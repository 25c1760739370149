//! Command-line interface parsing for the start page
//!
//! This module handles parsing of CLI arguments using clap. Every `serve`
//! option can also be supplied through the environment, which is how the
//! provider API keys are normally configured.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::dashboard::{SearchEngine, Settings, TemperatureUnits, TimeFormat};
use crate::upstream::{images, weather};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified time format is not recognized
    #[error("Invalid time format: '{0}'. Valid formats: 12-hr, 12-hr-am-pm, 24-hr")]
    InvalidTimeFormat(String),

    /// The specified temperature unit is not recognized
    #[error("Invalid temperature units: '{0}'. Valid units: celsius, fahrenheit, kelvin")]
    InvalidUnits(String),

    /// The specified search engine is not recognized
    #[error("Invalid search engine: '{0}'. Valid engines: google, bing, yahoo, duck-duck-go")]
    InvalidSearchEngine(String),
}

/// Start page dashboard - serve the dashboard backend or view it from a terminal
#[derive(Parser, Debug)]
#[command(name = "startpage")]
#[command(about = "Personal start-page dashboard with quotes, weather and background images")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the dashboard backend
    Serve(ServeArgs),

    /// Fetch the dashboard from a running server and print it
    Show {
        /// Base URL of the dashboard server
        #[arg(long, env = "STARTPAGE_SERVER", default_value = "http://127.0.0.1:3000")]
        server: String,
    },

    /// Show or change the saved dashboard settings
    Settings(SettingsArgs),

    /// Print a web search URL for the query using the saved search engine
    Search {
        /// Words to search for
        #[arg(required = true)]
        query: Vec<String>,
    },
}

/// Options for `startpage serve`
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Directory of static assets served at `/`
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// JSON file of `{ "text", "author" }` quotes (defaults to the bundled list)
    #[arg(long, env = "QUOTES_FILE")]
    pub quotes: Option<PathBuf>,

    /// Seconds to cache weather and background image responses
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 6000)]
    pub cache_ttl: u64,

    /// ipstack access key
    #[arg(long, env = "IPSTACK_API_KEY", hide_env_values = true)]
    pub geolocation_key: Option<String>,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub weather_key: Option<String>,

    /// Unsplash access key
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    pub image_key: Option<String>,

    /// Unsplash collection to draw background images from
    #[arg(long, env = "UNSPLASH_COLLECTION_ID")]
    pub image_collection: Option<String>,

    #[arg(long, hide = true, default_value = weather::IPSTACK_BASE_URL)]
    pub geolocation_url: String,

    #[arg(long, hide = true, default_value = weather::OPENWEATHER_BASE_URL)]
    pub weather_url: String,

    #[arg(long, hide = true, default_value = images::UNSPLASH_BASE_URL)]
    pub image_url: String,
}

/// Options for `startpage settings`
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Name used in the greeting
    #[arg(long)]
    pub name: Option<String>,

    /// Clock format: 12-hr, 12-hr-am-pm or 24-hr
    #[arg(long, value_name = "FORMAT")]
    pub time_format: Option<String>,

    /// Temperature units: celsius, fahrenheit or kelvin
    #[arg(long, value_name = "UNITS")]
    pub units: Option<String>,

    /// Search engine: google, bing, yahoo or duck-duck-go
    #[arg(long, value_name = "ENGINE")]
    pub search_engine: Option<String>,

    /// Restore the default settings before applying other flags
    #[arg(long)]
    pub reset: bool,
}

impl SettingsArgs {
    /// Whether any flag asks for a change
    pub fn has_changes(&self) -> bool {
        self.reset
            || self.name.is_some()
            || self.time_format.is_some()
            || self.units.is_some()
            || self.search_engine.is_some()
    }

    /// Applies the requested changes on top of `current`.
    ///
    /// # Returns
    /// * `Ok(Settings)` with the changes applied
    /// * `Err(CliError)` if any value is not recognized; nothing is applied
    pub fn apply(&self, current: &Settings) -> Result<Settings, CliError> {
        let mut settings = if self.reset {
            Settings::default()
        } else {
            current.clone()
        };

        if let Some(name) = &self.name {
            settings.display_name = name.trim().to_string();
        }
        if let Some(format) = &self.time_format {
            settings.time_format = TimeFormat::from_str(format)
                .ok_or_else(|| CliError::InvalidTimeFormat(format.clone()))?;
        }
        if let Some(units) = &self.units {
            settings.temperature_units = TemperatureUnits::from_str(units)
                .ok_or_else(|| CliError::InvalidUnits(units.clone()))?;
        }
        if let Some(engine) = &self.search_engine {
            settings.search_engine = SearchEngine::from_str(engine)
                .ok_or_else(|| CliError::InvalidSearchEngine(engine.clone()))?;
        }

        Ok(settings)
    }
}
