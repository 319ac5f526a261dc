//! Maps widget state to what the user sees.

use std::fmt;

use crate::{controller::UiState, geolocation::GeolocationStatus, model::WeatherSnapshot};

pub const TITLE: &str = "WEATHERIZER";
pub const INPUT_PROMPT: &str = "> Enter city name";
pub const LOADING: &str = "Loading...";
pub const GEOLOCATION_UNSUPPORTED: &str = "Your browser does not support Geolocation";
pub const GEOLOCATION_DISABLED: &str = "Geolocation is not enabled";
pub const GEOLOCATION_PENDING: &str = "Getting your location...";

/// A rendered frame, one entry per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    lines: Vec<String>,
}

impl View {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

pub fn render(state: &UiState, geolocation: &GeolocationStatus) -> View {
    let mut lines = vec![TITLE.to_string(), INPUT_PROMPT.to_string()];

    match state {
        UiState::Idle => {}
        UiState::Loading => lines.push(LOADING.to_string()),
        UiState::Error(message) => lines.push(message.clone()),
        UiState::Loaded(snapshot) => weather_panel(snapshot, &mut lines),
    }

    if let Some(status) = geolocation_line(geolocation) {
        lines.push(status.to_string());
    }

    View { lines }
}

fn weather_panel(snapshot: &WeatherSnapshot, lines: &mut Vec<String>) {
    lines.push(format!("{}, {}", snapshot.location_name, snapshot.country));
    lines.push(format!("Temperature: {}°C", snapshot.temperature_c));
    lines.push(format!("Condition: {}", snapshot.condition));

    if let Some(icon) = &snapshot.icon_url {
        lines.push(format!("Icon: {icon}"));
    }
    if let Some(feels_like) = snapshot.feels_like_c {
        lines.push(format!("Feels like: {feels_like}°C"));
    }
    if let Some(at) = snapshot.observation_time {
        lines.push(format!("Updated: {}", at.format("%Y-%m-%d %H:%M UTC")));
    }
}

fn geolocation_line(status: &GeolocationStatus) -> Option<&'static str> {
    match status {
        GeolocationStatus::Unavailable => Some(GEOLOCATION_UNSUPPORTED),
        GeolocationStatus::Disabled => Some(GEOLOCATION_DISABLED),
        GeolocationStatus::Pending => Some(GEOLOCATION_PENDING),
        GeolocationStatus::Resolved(_) => None,
    }
}
