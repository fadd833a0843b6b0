use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Parse an Open-Meteo style local timestamp (`2024-05-01T13:00`).
///
/// Seconds are optional. Timestamps with an offset keep their local wall-clock
/// reading.
pub fn parse_local_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
}

fn local_times<'de, D>(deserializer: D) -> Result<Vec<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    raw.iter()
        .map(|s| {
            parse_local_datetime(s).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {s}")))
        })
        .collect()
}

fn optional_local_time<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_local_datetime))
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Fallback label when no place name is known
    pub fn label(&self) -> String {
        format!("Lat {:.2}, Lon {:.2}", self.latitude, self.longitude)
    }
}

/// A resolved place that can drive a forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name, or `auto` to let the API pick
    pub timezone: String,
}

impl Place {
    pub fn new(display_name: impl Into<String>, coords: Coordinates) -> Self {
        Self {
            display_name: display_name.into(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            timezone: "auto".to_string(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Hour-indexed parallel arrays. Every sequence is aligned with `time`;
/// shorter sequences are treated as missing values past their end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    #[serde(default, deserialize_with = "local_times")]
    pub time: Vec<NaiveDateTime>,
    /// mm
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    /// percent, 0-100
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default, rename = "temperature_2m")]
    pub temperature: Vec<Option<f64>>,
    #[serde(default, rename = "wind_speed_10m")]
    pub wind_speed: Vec<Option<f64>>,
    #[serde(default, rename = "relative_humidity_2m")]
    pub relative_humidity: Vec<Option<f64>>,
    #[serde(default)]
    pub uv_index: Vec<Option<f64>>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Day-indexed parallel arrays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<NaiveDate>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default, rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(default, rename = "temperature_2m_min")]
    pub temperature_min: Vec<Option<f64>>,
    /// Local timestamps (`2024-05-01T06:21`) as returned by the API
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
}

impl DailySeries {
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.time.iter().position(|d| *d == date)
    }
}

/// Conditions reported for the current moment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default, deserialize_with = "optional_local_time")]
    pub time: Option<NaiveDateTime>,
    #[serde(default, rename = "temperature_2m")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    /// km/h
    #[serde(default, rename = "wind_speed_10m")]
    pub wind_speed: Option<f64>,
    #[serde(default, rename = "relative_humidity_2m")]
    pub relative_humidity: Option<f64>,
}

/// Forecast response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub current: CurrentConditions,
    #[serde(default)]
    pub hourly: HourlySeries,
    #[serde(default)]
    pub daily: DailySeries,
}

/// Current US AQI reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub us_aqi: Option<f64>,
}

/// Result of a reverse geocoding lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversePlace {
    pub name: String,
    pub country: Option<String>,
}

impl ReversePlace {
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Everything fetched for one place in one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub place: Place,
    pub forecast: Forecast,
    /// `None` when the air quality request failed
    pub air_quality: Option<AirQuality>,
    pub fetched_at: DateTime<Utc>,
}

impl ForecastBundle {
    /// The instant the forecast considers "now", falling back to the local clock.
    pub fn reference_time(&self) -> NaiveDateTime {
        self.forecast
            .current
            .time
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }

    /// Timezone reported by the API, or the one requested
    pub fn timezone(&self) -> &str {
        self.forecast
            .timezone
            .as_deref()
            .unwrap_or(&self.place.timezone)
    }
}

/// Location service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Service error: {0}")]
    Service(String),
    #[error("Place not found: {0}")]
    PlaceNotFound(String),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_local_datetime_formats() {
        let a = parse_local_datetime("2024-05-01T13:00").unwrap();
        let b = parse_local_datetime("2024-05-01T13:00:00").unwrap();
        let c = parse_local_datetime("2024-05-01T13:00:00-03:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.hour(), 13);
        assert!(parse_local_datetime("13:00").is_none());
        assert!(parse_local_datetime("garbage").is_none());
    }

    #[test]
    fn test_hourly_deserialization_with_nulls() {
        let json = serde_json::json!({
            "time": ["2024-05-01T00:00", "2024-05-01T01:00"],
            "precipitation": [0.0, null],
            "precipitation_probability": [10, 20],
            "temperature_2m": [18.5, 18.1]
        });
        let hourly: HourlySeries = serde_json::from_value(json).unwrap();
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly.precipitation, vec![Some(0.0), None]);
        assert_eq!(hourly.precipitation_probability, vec![Some(10.0), Some(20.0)]);
        assert!(hourly.uv_index.is_empty());
    }

    #[test]
    fn test_hourly_rejects_bad_timestamp() {
        let json = serde_json::json!({ "time": ["yesterday"] });
        assert!(serde_json::from_value::<HourlySeries>(json).is_err());
    }

    #[test]
    fn test_forecast_tolerates_missing_sections() {
        let forecast: Forecast = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(forecast.hourly.is_empty());
        assert!(forecast.daily.time.is_empty());
        assert!(forecast.current.time.is_none());
    }

    #[test]
    fn test_reverse_place_display_name() {
        let with_country = ReversePlace {
            name: "Campinas".into(),
            country: Some("Brasil".into()),
        };
        let without = ReversePlace {
            name: "Campinas".into(),
            country: None,
        };
        assert_eq!(with_country.display_name(), "Campinas, Brasil");
        assert_eq!(without.display_name(), "Campinas");
    }

    #[test]
    fn test_coordinates_label() {
        assert_eq!(Coordinates::new(-23.5505, -46.6333).label(), "Lat -23.55, Lon -46.63");
    }
}
