//! Dashboard state with per-topic change notification
//!
//! Every `update_*` call stores the new value and then publishes exactly one
//! `Update` to the listeners registered for that topic, in registration order.

use std::collections::HashMap;

use super::settings::{Settings, SettingsError, SettingsStore};
use crate::upstream::{BackgroundImage, Quote, WeatherResult};

/// Parts of the dashboard a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Settings,
    Quote,
    Weather,
    BackgroundImage,
}

/// A change published to listeners
#[derive(Debug, Clone, Copy)]
pub enum Update<'a> {
    Settings(&'a Settings),
    Quote(&'a Quote),
    Weather(&'a WeatherResult),
    BackgroundImage(&'a BackgroundImage),
}

impl Update<'_> {
    pub fn topic(&self) -> Topic {
        match self {
            Update::Settings(_) => Topic::Settings,
            Update::Quote(_) => Topic::Quote,
            Update::Weather(_) => Topic::Weather,
            Update::BackgroundImage(_) => Topic::BackgroundImage,
        }
    }
}

type Listener = Box<dyn Fn(&Update<'_>) + Send + Sync>;

/// Everything the dashboard displays
pub struct DashboardModel {
    settings: Settings,
    quote: Option<Quote>,
    weather: Option<WeatherResult>,
    background_image: Option<BackgroundImage>,
    listeners: HashMap<Topic, Vec<Listener>>,
}

impl DashboardModel {
    /// Creates a model with the given settings and no data yet
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            quote: None,
            weather: None,
            background_image: None,
            listeners: HashMap::new(),
        }
    }

    /// Creates a model from whatever settings the store holds
    pub fn load(store: &SettingsStore) -> Self {
        Self::new(store.load())
    }

    /// Registers a listener for one topic
    pub fn subscribe<F>(&mut self, topic: Topic, listener: F)
    where
        F: Fn(&Update<'_>) + Send + Sync + 'static,
    {
        self.listeners
            .entry(topic)
            .or_default()
            .push(Box::new(listener));
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.publish(Update::Settings(&self.settings));
    }

    pub fn update_quote(&mut self, quote: Quote) {
        let quote = self.quote.insert(quote);
        publish_to(&self.listeners, Update::Quote(quote));
    }

    pub fn update_weather(&mut self, weather: WeatherResult) {
        let weather = self.weather.insert(weather);
        publish_to(&self.listeners, Update::Weather(weather));
    }

    pub fn update_background_image(&mut self, image: BackgroundImage) {
        let image = self.background_image.insert(image);
        publish_to(&self.listeners, Update::BackgroundImage(image));
    }

    /// Persists the current settings
    pub fn save(&self, store: &SettingsStore) -> Result<(), SettingsError> {
        store.save(&self.settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn weather(&self) -> Option<&WeatherResult> {
        self.weather.as_ref()
    }

    pub fn background_image(&self) -> Option<&BackgroundImage> {
        self.background_image.as_ref()
    }

    fn publish(&self, update: Update<'_>) {
        publish_to(&self.listeners, update);
    }
}

fn publish_to(listeners: &HashMap<Topic, Vec<Listener>>, update: Update<'_>) {
    if let Some(listeners) = listeners.get(&update.topic()) {
        for listener in listeners {
            listener(&update);
        }
    }
}
