//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling (API key, reported city, endpoint override)
//! - The `WeatherLookup` abstraction and its OpenWeather implementation
//! - Shared domain models (`Coordinate`, `WeatherModel`) and `LookupError`
//! - Latest-only sequencing for overlapping location updates
//!
//! It is used by `weather-cli`, but can also be embedded in other front ends.

pub mod config;
pub mod error;
pub mod icon;
pub mod latest;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use config::Config;
pub use error::{DecodeError, LookupError};
pub use icon::{Symbol, icon_code_to_symbol};
pub use latest::LatestLookup;
pub use model::{Coordinate, CoordinateParseError, WeatherModel};
pub use pipeline::{LocationProvider, Presenter, run_updates};
pub use provider::{WeatherLookup, openweather::OpenWeatherService};
