//! Dashboard model for the start page
//!
//! This module holds what the start page shows and how it shows it: the
//! user's settings and their store, a model that publishes per-topic updates,
//! formatting helpers, and a client for a running dashboard server.

pub mod client;
pub mod format;
pub mod model;
pub mod settings;
pub mod view;

pub use client::{ClientError, DashboardClient};
pub use format::{convert_temperature, format_temperature, format_time, greeting, WeatherCondition};
pub use model::{DashboardModel, Topic, Update};
pub use settings::{
    SearchEngine, Settings, SettingsError, SettingsStore, TemperatureUnits, TimeFormat, SETTINGS_KEY,
};
pub use view::render_text;
