//! Open-Meteo forecast and air quality client.

use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use crate::types::{AirQuality, Forecast, ForecastBundle, Place, WeatherError};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
pub const REVERSE_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/reverse";

const CURRENT_FIELDS: &str = "temperature_2m,precipitation,wind_speed_10m,relative_humidity_2m";
const HOURLY_FIELDS: &str = "precipitation,precipitation_probability,temperature_2m,wind_speed_10m,relative_humidity_2m,uv_index";
const DAILY_FIELDS: &str = "precipitation_sum,precipitation_probability_max,temperature_2m_max,temperature_2m_min,sunrise,sunset";

/// Full URLs of the remote services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub air_quality: String,
    pub reverse_geocoding: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: GEOCODING_URL.to_string(),
            forecast: FORECAST_URL.to_string(),
            air_quality: AIR_QUALITY_URL.to_string(),
            reverse_geocoding: REVERSE_GEOCODING_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every service under one host, with the public APIs' paths.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            geocoding: format!("{base}/v1/search"),
            forecast: format!("{base}/v1/forecast"),
            air_quality: format!("{base}/v1/air-quality"),
            reverse_geocoding: format!("{base}/reverse"),
        }
    }
}

/// Request settings shared by every call
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub endpoints: Endpoints,
    pub language: String,
    pub result_limit: u32,
    pub forecast_days: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            language: "pt".to_string(),
            result_limit: 5,
            forecast_days: 7,
            timeout: Duration::from_secs(10),
            user_agent: format!("chuva/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Stateless client for geocoding, forecast, air quality and reverse geocoding.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    pub(crate) client: Client,
    pub(crate) options: ClientOptions,
}

impl WeatherClient {
    pub fn new(options: ClientOptions) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .build()?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Fetch current conditions plus hourly and daily series.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<Forecast, WeatherError> {
        let response = self
            .client
            .get(&self.options.endpoints.forecast)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("forecast_days", self.options.forecast_days.to_string()),
                ("timezone", timezone.to_string()),
            ])
            .send()
            .await?;

        let forecast: Forecast = handle_response(response).await?;
        tracing::info!(
            hours = forecast.hourly.len(),
            days = forecast.daily.time.len(),
            "Forecast received"
        );
        Ok(forecast)
    }

    /// Fetch the current US AQI.
    #[instrument(skip(self), level = "info")]
    pub async fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<AirQuality, WeatherError> {
        let response = self
            .client
            .get(&self.options.endpoints.air_quality)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", "us_aqi".to_string()),
                ("timezone", timezone.to_string()),
            ])
            .send()
            .await?;

        let body: AirQualityResponse = handle_response(response).await?;
        Ok(body.current.unwrap_or_default())
    }

    /// Fetch forecast and air quality concurrently.
    ///
    /// Only the forecast is required; an air quality failure is logged and
    /// leaves `air_quality` empty.
    pub async fn fetch_bundle(&self, place: &Place) -> Result<ForecastBundle, WeatherError> {
        let (forecast, air) = tokio::join!(
            self.forecast(place.latitude, place.longitude, &place.timezone),
            self.air_quality(place.latitude, place.longitude, &place.timezone),
        );

        let forecast = forecast?;
        let air_quality = match air {
            Ok(a) => Some(a),
            Err(e) => {
                tracing::warn!("Air quality unavailable: {}", e);
                None
            }
        };

        Ok(ForecastBundle {
            place: place.clone(),
            forecast,
            air_quality,
            fetched_at: Utc::now(),
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct AirQualityResponse {
    current: Option<AirQuality>,
}

/// Decode a success body, or turn the status into an error.
pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, WeatherError> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
    } else {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Request failed with status {}: {}", status, body);
        Err(WeatherError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        WeatherClient::new(ClientOptions {
            endpoints: Endpoints::with_base_url(&server.uri()),
            ..ClientOptions::default()
        })
        .unwrap()
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "timezone": "America/Sao_Paulo",
            "current": {
                "time": "2024-05-01T10:15",
                "temperature_2m": 22.4,
                "precipitation": 0.0,
                "wind_speed_10m": 12.0,
                "relative_humidity_2m": 81
            },
            "hourly": {
                "time": ["2024-05-01T10:00", "2024-05-01T11:00"],
                "precipitation": [0.0, 1.2],
                "precipitation_probability": [20, 75]
            },
            "daily": {
                "time": ["2024-05-01"],
                "precipitation_sum": [4.2],
                "precipitation_probability_max": [75],
                "sunrise": ["2024-05-01T06:21"],
                "sunset": ["2024-05-01T17:42"]
            }
        })
    }

    fn place() -> Place {
        Place {
            display_name: "São Paulo, BR".into(),
            latitude: -23.55,
            longitude: -46.63,
            timezone: "auto".into(),
        }
    }

    #[tokio::test]
    async fn test_forecast_sends_expected_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "-23.55"))
            .and(query_param("forecast_days", "7"))
            .and(query_param("timezone", "auto"))
            .and(query_param("hourly", HOURLY_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let forecast = client.forecast(-23.55, -46.63, "auto").await.unwrap();

        assert_eq!(forecast.timezone.as_deref(), Some("America/Sao_Paulo"));
        assert_eq!(forecast.hourly.len(), 2);
        assert_eq!(forecast.current.temperature, Some(22.4));
        assert_eq!(forecast.daily.sunrise[0].as_deref(), Some("2024-05-01T06:21"));
    }

    #[tokio::test]
    async fn test_forecast_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.forecast(0.0, 0.0, "auto").await;

        assert!(matches!(result, Err(WeatherError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_forecast_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.forecast(0.0, 0.0, "auto").await;

        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[tokio::test]
    async fn test_bundle_survives_air_quality_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let bundle = client.fetch_bundle(&place()).await.unwrap();

        assert!(bundle.air_quality.is_none());
        assert_eq!(bundle.timezone(), "America/Sao_Paulo");
    }

    #[tokio::test]
    async fn test_bundle_includes_air_quality() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .and(query_param("current", "us_aqi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": { "time": "2024-05-01T10:00", "us_aqi": 42 }
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let bundle = client.fetch_bundle(&place()).await.unwrap();

        assert_eq!(bundle.air_quality, Some(AirQuality { us_aqi: Some(42.0) }));
    }

    #[tokio::test]
    async fn test_bundle_fails_when_forecast_fails() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"current": {"us_aqi": 10}})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(client.fetch_bundle(&place()).await.is_err());
    }
}
