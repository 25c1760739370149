//! Display formatting for the dashboard: clock, temperature, weather symbols
//! and the greeting line.

use chrono::{NaiveTime, Timelike};

use super::settings::{TemperatureUnits, TimeFormat};

/// Formats a wall-clock time in the chosen style
///
/// 12-hour formats have no leading zero on the hour; 24-hour keeps it.
pub fn format_time(time: NaiveTime, format: TimeFormat) -> String {
    let (is_pm, hour12) = time.hour12();
    let minute = time.minute();

    match format {
        TimeFormat::TwelveHour => format!("{}:{:02}", hour12, minute),
        TimeFormat::TwelveHourAmPm => {
            format!("{}:{:02} {}", hour12, minute, if is_pm { "PM" } else { "AM" })
        }
        TimeFormat::TwentyFourHour => format!("{:02}:{:02}", time.hour(), minute),
    }
}

/// Converts a Kelvin reading into the chosen units
pub fn convert_temperature(kelvin: f64, units: TemperatureUnits) -> f64 {
    match units {
        TemperatureUnits::Kelvin => kelvin,
        TemperatureUnits::Celsius => kelvin - 273.15,
        TemperatureUnits::Fahrenheit => (kelvin - 273.15) * 9.0 / 5.0 + 32.0,
    }
}

/// Formats a Kelvin reading rounded to a whole degree, e.g. "12°C"
pub fn format_temperature(kelvin: f64, units: TemperatureUnits) -> String {
    let value = convert_temperature(kelvin, units).round();
    // Avoid printing "-0°C"
    let value = if value == 0.0 { 0.0 } else { value };

    match units {
        TemperatureUnits::Celsius => format!("{}°C", value),
        TemperatureUnits::Fahrenheit => format!("{}°F", value),
        TemperatureUnits::Kelvin => format!("{} K", value),
    }
}

/// Condition groups reported by the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    /// Mist, fog, haze, smoke, dust and friends
    Atmosphere,
    Unknown,
}

impl WeatherCondition {
    /// Maps a provider condition type ("Clouds", "Rain", ...) to a condition
    pub fn from_type(condition_type: &str) -> WeatherCondition {
        match condition_type.to_lowercase().trim() {
            "clear" => WeatherCondition::Clear,
            "clouds" => WeatherCondition::Clouds,
            "rain" => WeatherCondition::Rain,
            "drizzle" => WeatherCondition::Drizzle,
            "thunderstorm" => WeatherCondition::Thunderstorm,
            "snow" => WeatherCondition::Snow,
            "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" | "squall" | "tornado" => {
                WeatherCondition::Atmosphere
            }
            _ => WeatherCondition::Unknown,
        }
    }

    /// Single-character symbol for terminal output
    pub fn symbol(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "☀",
            WeatherCondition::Clouds => "☁",
            WeatherCondition::Rain | WeatherCondition::Drizzle => "☂",
            WeatherCondition::Thunderstorm => "⚡",
            WeatherCondition::Snow => "❄",
            WeatherCondition::Atmosphere => "≋",
            WeatherCondition::Unknown => "?",
        }
    }
}

/// Greeting for the given hour of day (0-23)
pub fn greeting(hour: u32, name: &str) -> String {
    let part_of_day = match hour {
        5..=11 => "morning",
        12..=17 => "afternoon",
        _ => "evening",
    };

    let name = name.trim();
    if name.is_empty() {
        format!("Good {}", part_of_day)
    } else {
        format!("Good {}, {}", part_of_day, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_format_time_twelve_hour() {
        assert_eq!(format_time(time(15, 7), TimeFormat::TwelveHour), "3:07");
        assert_eq!(format_time(time(0, 30), TimeFormat::TwelveHour), "12:30");
        assert_eq!(format_time(time(12, 0), TimeFormat::TwelveHour), "12:00");
    }

    #[test]
    fn test_format_time_am_pm() {
        assert_eq!(format_time(time(15, 7), TimeFormat::TwelveHourAmPm), "3:07 PM");
        assert_eq!(format_time(time(0, 5), TimeFormat::TwelveHourAmPm), "12:05 AM");
        assert_eq!(format_time(time(12, 0), TimeFormat::TwelveHourAmPm), "12:00 PM");
        assert_eq!(format_time(time(9, 45), TimeFormat::TwelveHourAmPm), "9:45 AM");
    }

    #[test]
    fn test_format_time_twenty_four_hour() {
        assert_eq!(format_time(time(15, 7), TimeFormat::TwentyFourHour), "15:07");
        assert_eq!(format_time(time(7, 3), TimeFormat::TwentyFourHour), "07:03");
        assert_eq!(format_time(time(0, 0), TimeFormat::TwentyFourHour), "00:00");
    }

    #[test]
    fn test_convert_temperature() {
        assert!((convert_temperature(273.15, TemperatureUnits::Celsius)).abs() < 1e-9);
        assert!((convert_temperature(373.15, TemperatureUnits::Fahrenheit) - 212.0).abs() < 1e-9);
        assert!((convert_temperature(300.0, TemperatureUnits::Kelvin) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(285.37, TemperatureUnits::Celsius), "12°C");
        assert_eq!(format_temperature(285.37, TemperatureUnits::Fahrenheit), "54°F");
        assert_eq!(format_temperature(285.37, TemperatureUnits::Kelvin), "285 K");
        assert_eq!(format_temperature(273.0, TemperatureUnits::Celsius), "0°C");
    }

    #[test]
    fn test_weather_condition_mapping() {
        assert_eq!(WeatherCondition::from_type("Clear"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_type("Clouds"), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_type("Rain"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_type("Drizzle"), WeatherCondition::Drizzle);
        assert_eq!(
            WeatherCondition::from_type("Thunderstorm"),
            WeatherCondition::Thunderstorm
        );
        assert_eq!(WeatherCondition::from_type("Snow"), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_type("Mist"), WeatherCondition::Atmosphere);
        assert_eq!(WeatherCondition::from_type("Haze"), WeatherCondition::Atmosphere);
        assert_eq!(WeatherCondition::from_type("Meteors"), WeatherCondition::Unknown);
    }

    #[test]
    fn test_every_condition_has_a_symbol() {
        for condition in [
            WeatherCondition::Clear,
            WeatherCondition::Clouds,
            WeatherCondition::Rain,
            WeatherCondition::Drizzle,
            WeatherCondition::Thunderstorm,
            WeatherCondition::Snow,
            WeatherCondition::Atmosphere,
            WeatherCondition::Unknown,
        ] {
            assert!(!condition.symbol().is_empty());
        }
    }

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(8, "Ada"), "Good morning, Ada");
        assert_eq!(greeting(12, "Ada"), "Good afternoon, Ada");
        assert_eq!(greeting(18, "Ada"), "Good evening, Ada");
        assert_eq!(greeting(2, "Ada"), "Good evening, Ada");
        assert_eq!(greeting(9, "  "), "Good morning");
    }
}
