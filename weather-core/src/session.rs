//! The widget's event loop.
//!
//! A [`Session`] owns the [`LookupController`] and is the only place that
//! mutates it. City submissions arrive on an input channel; location updates
//! and lookup completions come back from spawned tasks as events.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::{
    controller::{LookupController, LookupTicket, RequestToken},
    geolocation::{GeolocationStatus, LocationSource, PositionOptions},
    model::WeatherSnapshot,
    provider::{LookupError, WeatherProvider},
    view::{self, View},
};

#[derive(Debug)]
enum Event {
    CitySubmitted(String),
    LocationChanged(GeolocationStatus),
    LookupFinished(RequestToken, Result<WeatherSnapshot, LookupError>),
}

pub struct Session {
    provider: Arc<dyn WeatherProvider>,
    location: Arc<dyn LocationSource>,
    options: PositionOptions,
}

impl Session {
    pub fn new(provider: Arc<dyn WeatherProvider>, location: Arc<dyn LocationSource>) -> Self {
        Self { provider, location, options: PositionOptions::default() }
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs until `input` is closed and every started lookup has reported
    /// back. `on_render` receives a fresh frame after every state change.
    pub async fn run<F>(self, mut input: mpsc::Receiver<String>, mut on_render: F) -> LookupController
    where
        F: FnMut(&View),
    {
        let (tx, mut events) = mpsc::unbounded_channel::<Event>();

        let initial = if self.location.is_supported() {
            GeolocationStatus::Pending
        } else {
            GeolocationStatus::Unavailable
        };
        let mut controller = LookupController::new(initial);

        let mut locating = false;
        if self.location.is_supported() {
            locating = true;
            let location = Arc::clone(&self.location);
            let options = self.options;
            let tx = tx.clone();
            tokio::spawn(async move {
                let status = location.locate(&options).await;
                let _ = tx.send(Event::LocationChanged(status));
            });
        }

        on_render(&view::render(controller.state(), controller.geolocation()));

        let mut input_open = true;
        let mut in_flight = 0usize;

        loop {
            if !input_open && in_flight == 0 && !locating {
                break;
            }

            let event = tokio::select! {
                city = input.recv(), if input_open => match city {
                    Some(city) => Event::CitySubmitted(city),
                    None => {
                        debug!("input closed");
                        input_open = false;
                        continue;
                    }
                },
                Some(event) = events.recv() => event,
            };

            let ticket = match event {
                Event::CitySubmitted(city) => controller.submit_city(&city),
                Event::LocationChanged(status) => {
                    locating = false;
                    controller.location_changed(status)
                }
                Event::LookupFinished(token, result) => {
                    in_flight -= 1;
                    match result {
                        Ok(snapshot) => {
                            controller.lookup_succeeded(token, snapshot);
                        }
                        Err(err) => {
                            error!(detail = err.detail(), "Error fetching weather data: {err}");
                            controller.lookup_failed(token, &err);
                        }
                    }
                    None
                }
            };

            if let Some(ticket) = ticket {
                in_flight += 1;
                self.spawn_lookup(ticket, tx.clone());
            }

            on_render(&view::render(controller.state(), controller.geolocation()));
        }

        controller
    }

    fn spawn_lookup(&self, ticket: LookupTicket, tx: mpsc::UnboundedSender<Event>) {
        let provider = Arc::clone(&self.provider);
        tokio::spawn(async move {
            let result = provider.fetch_weather(&ticket.query).await;
            let _ = tx.send(Event::LookupFinished(ticket.token, result));
        });
    }
}

/// Performs a single lookup outside of a session and renders the outcome.
pub async fn lookup_once(provider: &dyn WeatherProvider, city: &str) -> View {
    let mut controller = LookupController::new(GeolocationStatus::Disabled);

    if let Some(ticket) = controller.submit_city(city) {
        match provider.fetch_weather(&ticket.query).await {
            Ok(snapshot) => {
                controller.lookup_succeeded(ticket.token, snapshot);
            }
            Err(err) => {
                error!(detail = err.detail(), "Error fetching weather data: {err}");
                controller.lookup_failed(ticket.token, &err);
            }
        }
    }

    view::render(controller.state(), controller.geolocation())
}
