//! Display formatting. Missing or non-finite values render as [`MISSING`].

use chrono::{Datelike, NaiveDate, Weekday};
use chuva_core::TemperatureUnit;
use chuva_weather::{Tone, ValueRange};

pub const MISSING: &str = "—";

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn temperature_number(value: Option<f64>, unit: TemperatureUnit, decimals: usize) -> Option<String> {
    let converted = unit.convert(finite(value)?)?;
    Some(format!("{:.*}", decimals, converted))
}

/// `22.4 °C`
pub fn temperature(value: Option<f64>, unit: TemperatureUnit) -> String {
    match temperature_number(value, unit, 1) {
        Some(n) => format!("{} {}", n, unit.label()),
        None => MISSING.to_string(),
    }
}

/// `17.0 / 28.0 °C`; missing when either end is missing.
pub fn temperature_range(min: Option<f64>, max: Option<f64>, unit: TemperatureUnit) -> String {
    match (temperature_number(min, unit, 1), temperature_number(max, unit, 1)) {
        (Some(lo), Some(hi)) => format!("{} / {} {}", lo, hi, unit.label()),
        _ => MISSING.to_string(),
    }
}

/// `17/28°C`, used on week cards
pub fn temperature_range_compact(min: Option<f64>, max: Option<f64>, unit: TemperatureUnit) -> String {
    match (temperature_number(min, unit, 0), temperature_number(max, unit, 0)) {
        (Some(lo), Some(hi)) => format!("{}/{}{}", lo, hi, unit.label()),
        _ => MISSING.to_string(),
    }
}

pub fn percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.0}%", v.round()),
        None => MISSING.to_string(),
    }
}

pub fn uv(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.1}", v),
        None => MISSING.to_string(),
    }
}

pub fn aqi(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.0}", v.round()),
        None => MISSING.to_string(),
    }
}

/// Wind speed arrives in km/h.
pub fn wind(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.0} km/h", v),
        None => MISSING.to_string(),
    }
}

pub fn millimetres(value: f64) -> String {
    format!("{:.1} mm", value)
}

/// `a / b` with either side allowed to be missing, or a single placeholder
/// when both are.
pub fn range(min: Option<f64>, max: Option<f64>, formatter: fn(Option<f64>) -> String) -> String {
    let (min, max) = (finite(min), finite(max));
    if min.is_none() && max.is_none() {
        return MISSING.to_string();
    }
    format!("{} / {}", formatter(min), formatter(max))
}

pub fn value_range(r: Option<ValueRange>, formatter: fn(Option<f64>) -> String) -> String {
    range(r.map(|r| r.min), r.map(|r| r.max), formatter)
}

/// `HH:MM` from `2024-05-01T06:21` or a bare `06:21`.
pub fn sun_time(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim) else {
        return MISSING.to_string();
    };

    let candidate = match raw.split_once('T') {
        Some((_, time)) => time,
        None => raw,
    };
    let hhmm = candidate.get(..5).filter(|s| {
        let b = s.as_bytes();
        b[2] == b':' && [0, 1, 3, 4].iter().all(|&i| b[i].is_ascii_digit())
    });

    match hhmm {
        Some(s) => s.to_string(),
        None => MISSING.to_string(),
    }
}

/// `dd/mm`
pub fn day_month(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// Short Portuguese weekday name
pub fn weekday(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "seg",
        Weekday::Tue => "ter",
        Weekday::Wed => "qua",
        Weekday::Thu => "qui",
        Weekday::Fri => "sex",
        Weekday::Sat => "sáb",
        Weekday::Sun => "dom",
    }
}

/// US AQI category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Moderate,
    Poor,
}

impl AqiLevel {
    pub fn classify(value: Option<f64>) -> Option<Self> {
        let v = finite(value)?;
        Some(if v <= 50.0 {
            Self::Good
        } else if v <= 100.0 {
            Self::Moderate
        } else {
            Self::Poor
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Bom",
            Self::Moderate => "Moderado",
            Self::Poor => "Ruim",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Good => Tone::Good,
            Self::Moderate => Tone::Warn,
            Self::Poor => Tone::Bad,
        }
    }
}

/// `42 • Bom`, or the placeholder when unavailable.
pub fn air_quality(value: Option<f64>) -> String {
    match AqiLevel::classify(value) {
        Some(level) => format!("{} • {}", aqi(value), level.label()),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_units() {
        assert_eq!(temperature(Some(22.44), TemperatureUnit::Celsius), "22.4 °C");
        assert_eq!(temperature(Some(0.0), TemperatureUnit::Fahrenheit), "32.0 °F");
        assert_eq!(temperature(Some(0.0), TemperatureUnit::Kelvin), "273.1 K");
        assert_eq!(temperature(None, TemperatureUnit::Celsius), MISSING);
        assert_eq!(temperature(Some(f64::NAN), TemperatureUnit::Celsius), MISSING);
    }

    #[test]
    fn test_temperature_ranges() {
        assert_eq!(
            temperature_range(Some(17.0), Some(28.26), TemperatureUnit::Celsius),
            "17.0 / 28.3 °C"
        );
        assert_eq!(
            temperature_range(Some(17.0), None, TemperatureUnit::Celsius),
            MISSING
        );
        assert_eq!(
            temperature_range_compact(Some(17.0), Some(28.0), TemperatureUnit::Fahrenheit),
            "63/82°F"
        );
    }

    #[test]
    fn test_percent_uv_aqi_wind() {
        assert_eq!(percent(Some(80.6)), "81%");
        assert_eq!(percent(None), MISSING);
        assert_eq!(uv(Some(5.0)), "5.0");
        assert_eq!(aqi(Some(42.4)), "42");
        assert_eq!(wind(Some(12.4)), "12 km/h");
        assert_eq!(millimetres(3.0), "3.0 mm");
    }

    #[test]
    fn test_range() {
        assert_eq!(range(Some(60.0), Some(90.0), percent), "60% / 90%");
        assert_eq!(range(None, Some(90.0), percent), "— / 90%");
        assert_eq!(range(None, None, percent), MISSING);
        assert_eq!(value_range(None, uv), MISSING);
    }

    #[test]
    fn test_sun_time() {
        assert_eq!(sun_time(Some("2024-05-01T06:21")), "06:21");
        assert_eq!(sun_time(Some("06:21")), "06:21");
        assert_eq!(sun_time(Some("amanhã")), MISSING);
        assert_eq!(sun_time(None), MISSING);
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(day_month(date), "01/05");
        assert_eq!(weekday(date), "qua");
    }

    #[test]
    fn test_aqi_classification() {
        assert_eq!(AqiLevel::classify(Some(50.0)), Some(AqiLevel::Good));
        assert_eq!(AqiLevel::classify(Some(50.1)), Some(AqiLevel::Moderate));
        assert_eq!(AqiLevel::classify(Some(100.0)), Some(AqiLevel::Moderate));
        assert_eq!(AqiLevel::classify(Some(101.0)), Some(AqiLevel::Poor));
        assert_eq!(AqiLevel::classify(Some(f64::INFINITY)), None);
        assert_eq!(air_quality(Some(63.0)), "63 • Moderado");
        assert_eq!(AqiLevel::Poor.tone(), Tone::Bad);
    }
}
