use crate::services::weather_service::ServiceError;
use chuva_core::{AppError, LocationError, NetworkError, ReqwestErrorExt, WeatherError};
use chuva_weather::{LocationError as RawLocationError, WeatherError as RawWeatherError};

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Geocoding(RawWeatherError::PlaceNotFound(q)) => {
                AppError::Weather(WeatherError::PlaceNotFound(q))
            }
            ServiceError::Geocoding(e) => {
                map_weather(e, |s| AppError::Weather(WeatherError::GeocodingFailed(s)))
            }
            ServiceError::Forecast(e) => {
                map_weather(e, |s| AppError::Weather(WeatherError::ForecastFailed(s)))
            }
            ServiceError::Location(e) => AppError::Location(map_location(e)),
            ServiceError::NotInitialized => {
                AppError::Other(anyhow::anyhow!("async runtime not initialized"))
            }
        }
    }
}

/// Transport problems keep their network meaning; everything else belongs to
/// the step that failed.
fn map_weather(e: RawWeatherError, step: impl FnOnce(String) -> AppError) -> AppError {
    match e {
        RawWeatherError::Network(err) => AppError::Network(err.into_network_error()),
        RawWeatherError::Status { status, body } if status >= 500 => {
            AppError::Network(NetworkError::ServerError {
                status,
                message: body,
            })
        }
        RawWeatherError::Location(l) => AppError::Location(map_location(l)),
        other => step(other.to_string()),
    }
}

fn map_location(e: RawLocationError) -> LocationError {
    match e {
        RawLocationError::PermissionDenied => LocationError::Denied,
        RawLocationError::Timeout => LocationError::Timeout,
        RawLocationError::ServiceUnavailable => {
            LocationError::Unavailable("no location provider".to_string())
        }
        RawLocationError::Other(s) => LocationError::Unavailable(s),
    }
}
