use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = anyhow::Error;

    /// Parses `"<lat>,<lon>"`, the same shape the provider accepts as a query.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Expected coordinates as '<lat>,<lon>', got '{s}'"))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid latitude '{}'", lat.trim()))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid longitude '{}'", lon.trim()))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(anyhow::anyhow!(
                "Coordinates out of range: latitude must be -90..90, longitude -180..180"
            ));
        }

        Ok(Self { latitude, longitude })
    }
}

/// What a single lookup asks the provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupQuery {
    Place(String),
    Coordinates(Coordinates),
}

impl fmt::Display for LookupQuery {
    /// Wire form of the `q` parameter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupQuery::Place(name) => f.write_str(name),
            LookupQuery::Coordinates(coords) => write!(f, "{coords}"),
        }
    }
}

/// Current conditions for one location, as returned by a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: Option<f64>,
    pub condition: String,
    pub icon_url: Option<String>,
    pub observation_time: Option<DateTime<Utc>>,
}
