use std::{fmt, num::ParseFloatError, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// A latitude/longitude pair in decimal degrees.
///
/// Ranges ([-90, 90] and [-180, 180]) are the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateParseError {
    #[error("expected `lat,lon`, got '{0}'")]
    Shape(String),
    #[error("invalid number in '{input}': {source}")]
    Number {
        input: String,
        #[source]
        source: ParseFloatError,
    },
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    /// Parses `"43.46,-80.52"`; whitespace around either part is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::Shape(s.to_string()))?;

        let parse = |part: &str| {
            part.trim().parse::<f64>().map_err(|source| CoordinateParseError::Number {
                input: s.to_string(),
                source,
            })
        };

        Ok(Self::new(parse(lat)?, parse(lon)?))
    }
}

/// Current conditions normalized for display, independent of any provider's wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherModel {
    pub city: String,
    pub description: String,
    pub icon_code: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_with_whitespace() {
        let c: Coordinate = " 43.4643 , -80.5204 ".parse().expect("valid coordinate");
        assert_eq!(c, Coordinate::new(43.4643, -80.5204));
    }

    #[test]
    fn rejects_coordinate_without_comma() {
        let err = "43.4643".parse::<Coordinate>().unwrap_err();
        assert_eq!(err, CoordinateParseError::Shape("43.4643".into()));
    }

    #[test]
    fn rejects_coordinate_with_bad_number() {
        let err = "north,-80.5".parse::<Coordinate>().unwrap_err();
        assert!(matches!(err, CoordinateParseError::Number { .. }));
        assert!(err.to_string().contains("north,-80.5"));
    }

    #[test]
    fn display_is_parseable() {
        let c = Coordinate::new(-33.8688, 151.2093);
        assert_eq!(c.to_string().parse::<Coordinate>(), Ok(c));
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!Coordinate::new(f64::NAN, 0.0).is_finite());
        assert!(Coordinate::new(90.0, -180.0).is_finite());
    }
}
