use crate::{Coordinate, LookupError, WeatherModel};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Coordinate → current conditions. One network request per call, no retries.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        api_key: &str,
    ) -> Result<WeatherModel, LookupError>;
}

