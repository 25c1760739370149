//! Dashboard settings and their on-disk store
//!
//! Settings are a single JSON document stored under the `DashboardProject`
//! key, which on disk is `DashboardProject.json` in the user's data directory.

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Key the settings document is stored under
pub const SETTINGS_KEY: &str = "DashboardProject";

/// Errors that can occur while saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How the clock is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// "3:07"
    #[default]
    #[serde(rename = "12-hr")]
    TwelveHour,
    /// "3:07 PM"
    #[serde(rename = "12-hr-am-pm")]
    TwelveHourAmPm,
    /// "15:07"
    #[serde(rename = "24-hr")]
    TwentyFourHour,
}

impl TimeFormat {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<TimeFormat> {
        match s.to_lowercase().trim() {
            "12-hr" | "12" => Some(TimeFormat::TwelveHour),
            "12-hr-am-pm" | "am-pm" => Some(TimeFormat::TwelveHourAmPm),
            "24-hr" | "24" => Some(TimeFormat::TwentyFourHour),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "12-hr",
            TimeFormat::TwelveHourAmPm => "12-hr-am-pm",
            TimeFormat::TwentyFourHour => "24-hr",
        }
    }
}

/// Units temperatures are displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnits {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnits {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<TemperatureUnits> {
        match s.to_lowercase().trim() {
            "celsius" | "c" => Some(TemperatureUnits::Celsius),
            "fahrenheit" | "f" => Some(TemperatureUnits::Fahrenheit),
            "kelvin" | "k" => Some(TemperatureUnits::Kelvin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnits::Celsius => "celsius",
            TemperatureUnits::Fahrenheit => "fahrenheit",
            TemperatureUnits::Kelvin => "kelvin",
        }
    }
}

/// Web search provider used by the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    Yahoo,
    DuckDuckGo,
}

impl SearchEngine {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<SearchEngine> {
        match s.to_lowercase().trim() {
            "google" => Some(SearchEngine::Google),
            "bing" => Some(SearchEngine::Bing),
            "yahoo" => Some(SearchEngine::Yahoo),
            "duck-duck-go" | "duckduckgo" | "ddg" => Some(SearchEngine::DuckDuckGo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
            SearchEngine::Yahoo => "yahoo",
            SearchEngine::DuckDuckGo => "duck-duck-go",
        }
    }

    /// Human-readable provider name
    pub fn label(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::Bing => "Bing",
            SearchEngine::Yahoo => "Yahoo",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
        }
    }

    /// Builds the results URL for `query`
    pub fn search_url(&self, query: &str) -> String {
        let base = match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
            SearchEngine::Yahoo => "https://search.yahoo.com/search?p=",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com/?q=",
        };
        format!("{}{}", base, urlencoding::encode(query.trim()))
    }
}

/// User preferences for the dashboard
///
/// Missing fields fall back to their defaults, so older or partial documents
/// still load. A field holding a value this version does not recognise is
/// reset on its own; the rest of the document is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Name used in the greeting
    #[serde(deserialize_with = "display_name_or_default")]
    pub display_name: String,
    #[serde(alias = "defaultTimeFormat", deserialize_with = "or_default")]
    pub time_format: TimeFormat,
    #[serde(alias = "defaultTemperatureUnits", deserialize_with = "or_default")]
    pub temperature_units: TemperatureUnits,
    #[serde(alias = "defaultSearchEngine", deserialize_with = "or_default")]
    pub search_engine: SearchEngine,
}

fn display_name_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(name) => Ok(name),
        other => {
            tracing::warn!(value = %other, "ignoring non-text display name");
            Ok(Settings::default().display_name)
        }
    }
}

/// Reads one settings field, falling back to its default if the value is unusable
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).unwrap_or_else(|e| {
        tracing::warn!(value = %value, error = %e, "ignoring unrecognised setting");
        T::default()
    }))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: "John Smith".to_string(),
            time_format: TimeFormat::default(),
            temperature_units: TemperatureUnits::default(),
            search_engine: SearchEngine::default(),
        }
    }
}

/// Reads and writes the settings document
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Directory holding the settings file
    dir: PathBuf,
}

impl SettingsStore {
    /// Creates a SettingsStore in the XDG-compliant data directory
    ///
    /// Returns `None` if the data directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "startpage")?;
        Some(Self {
            dir: project_dirs.data_dir().to_path_buf(),
        })
    }

    /// Creates a SettingsStore with a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the settings file
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", SETTINGS_KEY))
    }

    /// Loads saved settings, or the defaults when none are saved
    ///
    /// An unreadable or corrupt file also yields the defaults.
    pub fn load(&self) -> Settings {
        let path = self.path();
        let Ok(content) = fs::read_to_string(&path) else {
            return Settings::default();
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        })
    }

    /// Saves settings, creating the directory if needed
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(self.path(), json)?;
        Ok(())
    }
}
