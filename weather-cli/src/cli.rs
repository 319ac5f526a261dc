use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info};
use weather_core::{
    Config, Coordinates, LocationSource, Session, View,
    geolocation::{Denied, FixedLocation},
    lookup_once,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key in the config file.
    Configure,

    /// Show current weather for a city and exit.
    Show {
        /// City name or location query.
        city: String,
    },

    /// Start the interactive widget (the default).
    Run(RunArgs),
}

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Use these coordinates instead of detecting the location, e.g. "48.85,2.35".
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    coords: Option<Coordinates>,

    /// Do not try to detect the location.
    #[arg(long, conflicts_with = "coords")]
    no_geolocation: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run(RunArgs::default())) {
            Command::Configure => configure(),
            Command::Show { city } => show(&city).await,
            Command::Run(args) => run_widget(args).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    let path = config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = config.provider()?;

    let view = lookup_once(&provider, city).await;
    println!("{view}");
    Ok(())
}

async fn run_widget(args: RunArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider = Arc::new(config.provider()?);

    let location: Arc<dyn LocationSource> = match (args.coords, args.no_geolocation) {
        (Some(coords), _) => Arc::new(FixedLocation(coords)),
        (None, true) => Arc::new(Denied),
        (None, false) => config.geolocation.location_source(),
    };
    info!(?location, base_url = config.base_url(), "starting widget");

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    debug!(error = %e, "stopped reading input");
                    break;
                }
            }
        }
    });

    Session::new(provider, location)
        .with_position_options(config.geolocation.position_options())
        .run(rx, print_frame)
        .await;

    Ok(())
}

fn print_frame(view: &View) {
    println!("{view}\n");
}
