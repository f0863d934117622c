use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_lookup::{
    Config, Coordinate, LatestLookup, OpenWeatherService, Presenter, WeatherLookup,
    config::DEFAULT_CITY, run_updates,
};

use crate::{location::LineLocations, presenter::TerminalPresenter};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a coordinate")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by commands that perform lookups.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// OpenWeather API key; overrides the configured one.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// City name reported with the result; overrides the configured one.
    #[arg(long)]
    pub city: Option<String>,

    /// Print each result as a single JSON line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the API key and reported city.
    Configure,

    /// Show current weather for one coordinate.
    Show {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Read `lat,lon` lines from stdin and show weather for the latest one.
    Watch {
        #[command(flatten)]
        lookup: LookupArgs,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, lookup } => show(Coordinate::new(lat, lon), lookup).await,
            Command::Watch { lookup } => watch(lookup).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(&api_key);
    config.require_api_key()?;

    let city = Text::new("City to report:")
        .with_default(config.city.as_deref().unwrap_or(DEFAULT_CITY))
        .prompt()
        .context("Failed to read city")?;
    config.city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Merge command-line overrides over the stored config.
fn resolve(args: &LookupArgs) -> anyhow::Result<(OpenWeatherService, String)> {
    let mut config = Config::load()?;

    if let Some(key) = &args.api_key {
        config.set_api_key(key);
    }
    if let Some(city) = &args.city {
        config.city = Some(city.clone());
    }

    let api_key = config.require_api_key()?.to_string();
    Ok((OpenWeatherService::from_config(&config), api_key))
}

async fn show(coordinate: Coordinate, args: LookupArgs) -> anyhow::Result<()> {
    let (service, api_key) = resolve(&args)?;
    let presenter = TerminalPresenter::new(args.json);

    let model = service
        .fetch(coordinate, &api_key)
        .await
        .with_context(|| format!("Weather lookup for {coordinate} failed"))?;

    presenter.render(&model);
    Ok(())
}

async fn watch(args: LookupArgs) -> anyhow::Result<()> {
    let (service, api_key) = resolve(&args)?;

    let mut locations = LineLocations::stdin();

    run_updates(
        &mut locations,
        Arc::new(LatestLookup::new(service)),
        Arc::from(api_key),
        Arc::new(TerminalPresenter::new(args.json)),
    )
    .await;

    finish_input(&mut locations)
}

/// Turn a read error that cut the location stream short into a failure.
fn finish_input<R>(locations: &mut LineLocations<R>) -> anyhow::Result<()> {
    match locations.take_error() {
        Some(e) => Err(e).context("Failed to read coordinates from stdin"),
        None => Ok(()),
    }
}
