use crate::model::{LookupQuery, WeatherSnapshot};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

pub use weatherapi::WeatherApiProvider;

/// Why a lookup failed, as far as the user is concerned.
///
/// The `Display` output is the message shown in place of the weather panel;
/// `Generic::detail` is diagnostic only and never rendered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("City not found. Please check the spelling and try again.")]
    CityNotFound,

    #[error("An error occurred while fetching weather data. Please try again later.")]
    Generic { detail: String },
}

impl LookupError {
    pub fn generic(detail: impl Into<String>) -> Self {
        LookupError::Generic { detail: detail.into() }
    }

    /// Message to put in front of the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Diagnostic text for logs.
    pub fn detail(&self) -> &str {
        match self {
            LookupError::CityNotFound => "provider answered 400",
            LookupError::Generic { detail } => detail,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::generic(format!("transport error: {err}"))
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::generic(format!("malformed response: {err}"))
    }
}

/// A source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, query: &LookupQuery) -> Result<WeatherSnapshot, LookupError>;
}
