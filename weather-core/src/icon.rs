//! Mapping from OpenWeather icon codes to display symbols.

/// A display symbol for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Sun,
    Moon,
    CloudSun,
    Cloud,
    CloudOutline,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
    Unknown,
}

const ICON_TABLE: &[(&str, Symbol)] = &[
    ("01d", Symbol::Sun),
    ("01n", Symbol::Moon),
    ("02d", Symbol::CloudSun),
    ("02n", Symbol::CloudSun),
    ("03d", Symbol::Cloud),
    ("03n", Symbol::Cloud),
    ("04d", Symbol::CloudOutline),
    ("04n", Symbol::CloudOutline),
    ("09d", Symbol::Drizzle),
    ("09n", Symbol::Drizzle),
    ("10d", Symbol::Rain),
    ("10n", Symbol::Rain),
    ("11d", Symbol::Thunderstorm),
    ("11n", Symbol::Thunderstorm),
    ("13d", Symbol::Snow),
    ("13n", Symbol::Snow),
    ("50d", Symbol::Fog),
    ("50n", Symbol::Fog),
];

/// Look up the symbol for an icon code. Unrecognized codes map to [`Symbol::Unknown`].
pub fn icon_code_to_symbol(code: &str) -> Symbol {
    ICON_TABLE
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, symbol)| *symbol)
        .unwrap_or(Symbol::Unknown)
}

impl Symbol {
    /// System symbol name, as used by the mobile app.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sun => "sun.max.fill",
            Self::Moon => "moon.fill",
            Self::CloudSun => "cloud.sun.fill",
            Self::Cloud => "cloud.fill",
            Self::CloudOutline => "cloud",
            Self::Drizzle => "cloud.drizzle.fill",
            Self::Rain => "cloud.rain.fill",
            Self::Thunderstorm => "cloud.bolt.fill",
            Self::Snow => "cloud.snow.fill",
            Self::Fog => "cloud.fog.fill",
            Self::Unknown => "questionmark.diamond.fill",
        }
    }

    /// Terminal-friendly glyph.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sun => "☀️",
            Self::Moon => "🌙",
            Self::CloudSun => "⛅",
            Self::Cloud | Self::CloudOutline => "☁️",
            Self::Drizzle => "🌦️",
            Self::Rain => "🌧️",
            Self::Thunderstorm => "⛈️",
            Self::Snow => "🌨️",
            Self::Fog => "🌫️",
            Self::Unknown => "❓",
        }
    }
}
