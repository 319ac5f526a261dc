//! State container for the lookup widget.
//!
//! Every change to [`UiState`] goes through one of the event methods on
//! [`LookupController`]. Each started lookup gets a [`RequestToken`]; only the
//! completion carrying the latest token is applied, so a slow response can
//! never overwrite the result of a lookup started after it.

use tracing::debug;

use crate::{
    geolocation::GeolocationStatus,
    model::{Coordinates, LookupQuery, WeatherSnapshot},
    provider::LookupError,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Loaded(WeatherSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A lookup the caller has to carry out and report back on.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTicket {
    pub token: RequestToken,
    pub query: LookupQuery,
}

#[derive(Debug, Clone)]
pub struct LookupController {
    state: UiState,
    geolocation: GeolocationStatus,
    last_coordinates: Option<Coordinates>,
    issued: u64,
}

impl LookupController {
    pub fn new(geolocation: GeolocationStatus) -> Self {
        Self {
            state: UiState::Idle,
            geolocation,
            last_coordinates: None,
            issued: 0,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn geolocation(&self) -> &GeolocationStatus {
        &self.geolocation
    }

    /// Token of the most recently started lookup, if any.
    pub fn latest_token(&self) -> Option<RequestToken> {
        (self.issued > 0).then_some(RequestToken(self.issued))
    }

    /// The user submitted a city name. Blank input is ignored.
    pub fn submit_city(&mut self, name: &str) -> Option<LookupTicket> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        Some(self.start(LookupQuery::Place(name.to_string())))
    }

    /// The location source reported a new status.
    pub fn location_changed(&mut self, status: GeolocationStatus) -> Option<LookupTicket> {
        self.geolocation = status;

        match status {
            GeolocationStatus::Resolved(coords) => self.coordinates_resolved(coords),
            _ => None,
        }
    }

    /// Coordinates became known. Only the first position, and later only a
    /// different one, starts a lookup.
    pub fn coordinates_resolved(&mut self, coords: Coordinates) -> Option<LookupTicket> {
        if self.last_coordinates == Some(coords) {
            debug!(%coords, "coordinates unchanged, no lookup");
            return None;
        }

        self.last_coordinates = Some(coords);
        Some(self.start(LookupQuery::Coordinates(coords)))
    }

    /// Returns `false` when the completion belongs to a superseded lookup.
    pub fn lookup_succeeded(&mut self, token: RequestToken, snapshot: WeatherSnapshot) -> bool {
        if !self.is_current(token) {
            return false;
        }

        self.state = UiState::Loaded(snapshot);
        true
    }

    /// Returns `false` when the completion belongs to a superseded lookup.
    pub fn lookup_failed(&mut self, token: RequestToken, error: &LookupError) -> bool {
        if !self.is_current(token) {
            return false;
        }

        self.state = UiState::Error(error.user_message());
        true
    }

    fn start(&mut self, query: LookupQuery) -> LookupTicket {
        self.issued += 1;
        self.state = UiState::Loading;

        let token = RequestToken(self.issued);
        debug!(token = token.value(), %query, "lookup started");

        LookupTicket { token, query }
    }

    fn is_current(&self, token: RequestToken) -> bool {
        let current = token.0 == self.issued;
        if !current {
            debug!(token = token.value(), latest = self.issued, "discarding stale completion");
        }
        current
    }
}

impl Default for LookupController {
    fn default() -> Self {
        Self::new(GeolocationStatus::Pending)
    }
}
