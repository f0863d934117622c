use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    Config, Coordinate, DecodeError, LookupError, WeatherModel,
    config::{DEFAULT_BASE_URL, DEFAULT_CITY},
};

use super::WeatherLookup;

/// Current-conditions lookup against the OpenWeather REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherService {
    http: Client,
    base_url: String,
    city: String,
}

impl Default for OpenWeatherService {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

impl OpenWeatherService {
    /// `city` is reported verbatim in every result.
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            city: city.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.city_or_default()).with_base_url(config.base_url_or_default())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, coordinate: Coordinate, api_key: &str) -> Result<Url, LookupError> {
        if api_key.trim().is_empty() {
            return Err(LookupError::InvalidRequest("API key is empty".to_string()));
        }
        if !coordinate.is_finite() {
            return Err(LookupError::InvalidRequest(format!(
                "coordinate ({coordinate}) is not a finite number"
            )));
        }

        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
            ],
        )
        .map_err(|e| {
            LookupError::InvalidRequest(format!("malformed base URL '{}': {e}", self.base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(LookupError::InvalidRequest(format!(
                "unsupported scheme '{}' in base URL '{}'",
                url.scheme(),
                self.base_url
            )));
        }

        Ok(url)
    }

    #[instrument(skip(self, api_key), fields(city = %self.city), level = "debug")]
    async fn fetch_current(
        &self,
        coordinate: Coordinate,
        api_key: &str,
    ) -> Result<WeatherModel, LookupError> {
        let url = self.build_url(coordinate, api_key).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected weather request before sending");
        })?;

        tracing::debug!(base_url = %self.base_url, "requesting current weather");

        let res = self.http.get(url).send().await.map_err(|e| {
            // reqwest puts the full URL, key included, into its errors.
            let e = e.without_url();
            tracing::warn!(error = %e, "weather request failed");
            LookupError::NetworkFailure(e)
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!(error = %e, "failed to read weather response body");
            LookupError::NetworkFailure(e)
        })?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "weather service returned non-success status");
        }

        decode_current(status.as_u16(), &body, &self.city).map_err(|e| {
            tracing::warn!(error = %e, "failed to decode weather response");
            LookupError::from(e)
        })
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherService {
    async fn fetch(
        &self,
        coordinate: Coordinate,
        api_key: &str,
    ) -> Result<WeatherModel, LookupError> {
        self.fetch_current(coordinate, api_key).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn decode_current(status: u16, body: &str, city: &str) -> Result<WeatherModel, DecodeError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|source| DecodeError::Json {
            status,
            body: truncate_body(body),
            source,
        })?;

    normalize(parsed, city)
}

/// Only the first `weather` entry is used.
fn normalize(parsed: OwCurrentResponse, city: &str) -> Result<WeatherModel, DecodeError> {
    let condition = parsed.weather.into_iter().next().ok_or(DecodeError::EmptyWeather)?;

    Ok(WeatherModel {
        city: city.to_string(),
        description: condition.description,
        icon_code: condition.icon,
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
