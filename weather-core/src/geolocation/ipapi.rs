use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::Coordinates;

use super::{GeolocationStatus, LocationSource, PositionOptions};

pub const DEFAULT_BASE_URL: &str = "http://ip-api.com";

/// Approximate device location from the public IP address (ip-api.com).
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    base_url: String,
    http: Client,
}

impl Default for IpApiLocator {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl IpApiLocator {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http: Client::new() }
    }

    async fn request(&self) -> Result<IpApiResponse, reqwest::Error> {
        self.http
            .get(format!("{}/json/", self.base_url))
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl LocationSource for IpApiLocator {
    async fn locate(&self, options: &PositionOptions) -> GeolocationStatus {
        // IP lookups have one precision; the flag is only reported.
        debug!(
            high_accuracy = options.enable_high_accuracy,
            timeout_ms = options.user_decision_timeout.as_millis() as u64,
            "locating via ip-api"
        );

        let response = match tokio::time::timeout(options.user_decision_timeout, self.request()).await
        {
            Err(_) => {
                warn!("no position within the decision timeout");
                return GeolocationStatus::Disabled;
            }
            Ok(Err(e)) => {
                warn!(error = %e, "ip geolocation request failed");
                return GeolocationStatus::Unavailable;
            }
            Ok(Ok(response)) => response,
        };

        match response {
            IpApiResponse { status, lat: Some(lat), lon: Some(lon), .. } if status == "success" => {
                GeolocationStatus::Resolved(Coordinates::new(lat, lon))
            }
            IpApiResponse { status, message, .. } => {
                warn!(%status, message = message.as_deref().unwrap_or(""), "ip geolocation refused");
                GeolocationStatus::Disabled
            }
        }
    }
}
