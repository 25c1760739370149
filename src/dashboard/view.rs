//! Plain-text rendering of the dashboard

use chrono::{NaiveTime, Timelike};

use super::format::{format_temperature, format_time, greeting, WeatherCondition};
use super::model::DashboardModel;

/// Renders the dashboard as it would appear at `now`
///
/// Sections whose data has not arrived are shown as unavailable.
pub fn render_text(model: &DashboardModel, now: NaiveTime) -> String {
    let settings = model.settings();
    let mut lines = vec![
        format_time(now, settings.time_format),
        greeting(now.hour(), &settings.display_name),
        String::new(),
    ];

    match model.weather() {
        Some(weather) => {
            let condition = WeatherCondition::from_type(&weather.weather.condition_type);
            lines.push(format!(
                "{} {} {}  {}",
                condition.symbol(),
                format_temperature(weather.weather.temp, settings.temperature_units),
                weather.weather.condition_type,
                weather.location
            ));
        }
        None => lines.push("Weather unavailable".to_string()),
    }

    match model.quote() {
        Some(quote) => {
            lines.push(format!("\"{}\"", quote.text));
            lines.push(format!("    - {}", quote.author));
        }
        None => lines.push("Quote unavailable".to_string()),
    }

    if let Some(image) = model.background_image() {
        lines.push(String::new());
        lines.push(format!("Photo by {} ({})", image.creator_name, image.creator_url));
    }

    lines.push(format!("Search with {}", settings.search_engine.label()));
    lines.join("\n")
}
