//! Core library for the `weather` lookup widget.
//!
//! This crate defines:
//! - The widget state machine and its event loop
//! - Abstractions over the weather provider and the device location
//! - A text renderer for the current state
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but any front end can drive a [`Session`].

pub mod config;
pub mod controller;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use config::{Config, GeolocationConfig};
pub use controller::{LookupController, LookupTicket, RequestToken, UiState};
pub use geolocation::{GeolocationStatus, LocationSource, PositionOptions};
pub use model::{Coordinates, LookupQuery, WeatherSnapshot};
pub use provider::{LookupError, WeatherApiProvider, WeatherProvider};
pub use session::{Session, lookup_once};
pub use view::{View, render};
