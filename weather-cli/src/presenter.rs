use std::io::{self, Write};

use chrono::Local;
use weather_lookup::{LookupError, Presenter, WeatherModel, icon_code_to_symbol};

/// Lines shown for one result, top to bottom.
pub fn label_stack(model: &WeatherModel) -> Vec<String> {
    let symbol = icon_code_to_symbol(&model.icon_code);

    vec![
        model.city.clone(),
        model.description.clone(),
        format!("{} ({})", symbol.glyph(), symbol.name()),
        format!("{}°C", decimal(model.temperature_c)),
        format!("Humidity: {}%", model.humidity_pct),
        format!("Wind Speed: {} m/s", decimal(model.wind_speed_mps)),
    ]
}

/// Shortest form of `value` that still shows a fractional digit: `21.0`, `3.25`.
fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Prints results to stdout and errors to stderr.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    json: bool,
}

impl TerminalPresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn write_model(&self, out: &mut impl Write, model: &WeatherModel) -> io::Result<()> {
        if self.json {
            let line = serde_json::to_string(model).map_err(io::Error::other)?;
            return writeln!(out, "{line}");
        }

        for line in label_stack(model) {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "Updated at {}", Local::now().format("%H:%M:%S"))?;
        writeln!(out)
    }
}

impl Presenter for TerminalPresenter {
    fn render(&self, model: &WeatherModel) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = self.write_model(&mut out, model) {
            tracing::error!(error = %e, "failed to write weather to stdout");
        }
    }

    fn render_error(&self, error: &LookupError) {
        tracing::warn!(error = %error, "weather lookup failed");
        eprintln!("{}", error.user_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> WeatherModel {
        WeatherModel {
            city: "Waterloo".into(),
            description: "clear sky".into(),
            icon_code: "01d".into(),
            temperature_c: 21.5,
            humidity_pct: 60,
            wind_speed_mps: 3.2,
        }
    }

    #[test]
    fn label_stack_order_and_format() {
        let lines = label_stack(&model());

        assert_eq!(
            lines,
            vec![
                "Waterloo",
                "clear sky",
                "☀️ (sun.max.fill)",
                "21.5°C",
                "Humidity: 60%",
                "Wind Speed: 3.2 m/s",
            ]
        );
    }

    #[test]
    fn whole_numbers_keep_one_decimal() {
        let mut m = model();
        m.temperature_c = 21.0;
        m.wind_speed_mps = 4.0;

        let lines = label_stack(&m);
        assert_eq!(lines[3], "21.0°C");
        assert_eq!(lines[5], "Wind Speed: 4.0 m/s");
    }

    #[test]
    fn decimal_keeps_full_precision() {
        assert_eq!(decimal(3.25), "3.25");
        assert_eq!(decimal(-0.5), "-0.5");
        assert_eq!(decimal(0.0), "0.0");
        assert_eq!(decimal(-7.0), "-7.0");
    }

    #[test]
    fn unknown_icon_uses_fallback_symbol() {
        let mut m = model();
        m.icon_code = "99z".into();

        assert_eq!(label_stack(&m)[2], "❓ (questionmark.diamond.fill)");
    }

    #[test]
    fn json_output_is_one_line() {
        let mut buf = Vec::new();
        TerminalPresenter::new(true).write_model(&mut buf, &model()).expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["icon_code"], "01d");
        assert_eq!(value["humidity_pct"], 60);
    }

    #[test]
    fn text_output_ends_with_timestamp_and_blank_line() {
        let mut buf = Vec::new();
        TerminalPresenter::new(false).write_model(&mut buf, &model()).expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[6].starts_with("Updated at "));
        assert_eq!(lines[7], "");
    }
}
