//! Device location as an external, permission-gated capability.
//!
//! A [`LocationSource`] answers with a [`GeolocationStatus`]; how it gets
//! there (a fixed point, an IP lookup, a fake in tests) is its own business.

use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::model::Coordinates;

pub mod ipapi;

pub use ipapi::IpApiLocator;

/// Availability of the device location, independent of any lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationStatus {
    /// The platform cannot locate at all.
    Unavailable,
    /// Locating is possible but was refused or not answered in time.
    Disabled,
    /// Still waiting for a position.
    Pending,
    Resolved(Coordinates),
}

impl GeolocationStatus {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeolocationStatus::Resolved(coords) => Some(*coords),
            _ => None,
        }
    }
}

/// How a position should be requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// How long the user (or the source) has to come up with a position.
    pub user_decision_timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            user_decision_timeout: Duration::from_secs(5),
        }
    }
}

#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Whether locating is possible at all. An unsupported source is never asked to locate.
    fn is_supported(&self) -> bool {
        true
    }

    async fn locate(&self, options: &PositionOptions) -> GeolocationStatus;
}

/// A platform without any location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl LocationSource for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    async fn locate(&self, _options: &PositionOptions) -> GeolocationStatus {
        GeolocationStatus::Unavailable
    }
}

/// Location switched off by the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct Denied;

#[async_trait]
impl LocationSource for Denied {
    async fn locate(&self, _options: &PositionOptions) -> GeolocationStatus {
        GeolocationStatus::Disabled
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn locate(&self, _options: &PositionOptions) -> GeolocationStatus {
        GeolocationStatus::Resolved(self.0)
    }
}
