use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    geolocation::{Denied, FixedLocation, IpApiLocator, LocationSource, PositionOptions},
    model::Coordinates,
    provider::{WeatherApiProvider, weatherapi::DEFAULT_BASE_URL},
};

/// Environment variable holding the WeatherAPI.com key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Key baked in at build time, if the variable was set when compiling.
const BUILD_API_KEY: Option<&str> = option_env!("WEATHER_API_KEY");

/// How the widget asks for the device location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeolocationConfig {
    /// `false` behaves like a denied permission prompt.
    pub enabled: bool,
    pub enable_high_accuracy: bool,
    pub user_decision_timeout_ms: u64,
    /// Skip detection and always use this position.
    pub coordinates: Option<Coordinates>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        let options = PositionOptions::default();
        Self {
            enabled: true,
            enable_high_accuracy: options.enable_high_accuracy,
            user_decision_timeout_ms: options.user_decision_timeout.as_millis() as u64,
            coordinates: None,
        }
    }
}

impl GeolocationConfig {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            enable_high_accuracy: self.enable_high_accuracy,
            user_decision_timeout: Duration::from_millis(self.user_decision_timeout_ms),
        }
    }

    pub fn location_source(&self) -> Arc<dyn LocationSource> {
        match (self.enabled, self.coordinates) {
            (false, _) => Arc::new(Denied),
            (true, Some(coords)) => Arc::new(FixedLocation(coords)),
            (true, None) => Arc::new(IpApiLocator::default()),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// WeatherAPI.com key.
    pub api_key: Option<String>,

    /// Override for the provider endpoint, e.g. "https://api.weatherapi.com/v1".
    pub base_url: Option<String>,

    /// Example TOML:
    /// [geolocation]
    /// enabled = true
    /// user_decision_timeout_ms = 5000
    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from, in order: the runtime environment, the config file, the build environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        pick_api_key(from_env.as_deref(), self.api_key.as_deref(), BUILD_API_KEY)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn provider(&self) -> Result<WeatherApiProvider> {
        let api_key = self.resolve_api_key()?;
        Ok(WeatherApiProvider::with_base_url(api_key, self.base_url()))
    }
}

fn pick_api_key(runtime: Option<&str>, file: Option<&str>, build: Option<&str>) -> Result<String> {
    [runtime, file, build]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` or set {API_KEY_ENV}."
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_position_options() {
        let cfg = Config::default();

        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.base_url(), "https://api.weatherapi.com/v1");
        assert_eq!(cfg.geolocation.position_options(), PositionOptions::default());
        assert!(cfg.geolocation.enabled);
    }

    #[test]
    fn parse_full_config() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            base_url = "http://localhost:8080/v1"

            [geolocation]
            enabled = true
            enable_high_accuracy = false
            user_decision_timeout_ms = 2500
            coordinates = { latitude = 48.85, longitude = 2.35 }
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.base_url(), "http://localhost:8080/v1");
        assert_eq!(
            cfg.geolocation.position_options(),
            PositionOptions {
                enable_high_accuracy: false,
                user_decision_timeout: Duration::from_millis(2500),
            }
        );
        assert_eq!(cfg.geolocation.coordinates, Some(Coordinates::new(48.85, 2.35)));
    }

    #[test]
    fn partial_geolocation_section_keeps_defaults() {
        let cfg = Config::from_toml("[geolocation]\nenabled = false\n").expect("config should parse");

        assert!(!cfg.geolocation.enabled);
        assert_eq!(cfg.geolocation.user_decision_timeout_ms, 5000);
        assert!(cfg.geolocation.enable_high_accuracy);
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.geolocation.coordinates = Some(Coordinates::new(-33.87, 151.21));

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");
        assert_eq!(back, cfg);
    }

    #[test]
    fn api_key_precedence() {
        assert_eq!(pick_api_key(Some("ENV"), Some("FILE"), Some("BUILD")).unwrap(), "ENV");
        assert_eq!(pick_api_key(None, Some("FILE"), Some("BUILD")).unwrap(), "FILE");
        assert_eq!(pick_api_key(Some("  "), None, Some("BUILD")).unwrap(), "BUILD");
    }

    #[test]
    fn missing_api_key_has_hint() {
        let err = pick_api_key(None, None, None).unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn location_source_follows_config() {
        let mut geo = GeolocationConfig::default();
        assert!(geo.location_source().is_supported());

        geo.enabled = false;
        let source = geo.location_source();
        assert!(format!("{source:?}").contains("Denied"));

        geo.enabled = true;
        geo.coordinates = Some(Coordinates::new(1.0, 2.0));
        assert!(format!("{:?}", geo.location_source()).contains("FixedLocation"));
    }
}
