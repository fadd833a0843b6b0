//! Weather backend: async geocoding, geolocation and forecast fetching.
//! All network work runs on spawned tasks; results are sent via mpsc.

use std::sync::Arc;

use chuva_weather::{
    Coordinates, ForecastBundle, Geolocator, LocationError, LocationProvider, Place,
    WeatherClient, WeatherError,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::autocomplete::Debouncer;
use crate::state::RequestToken;
use crate::status;

/// Error type for weather operations, tagged by the step that failed
#[derive(Debug)]
pub enum ServiceError {
    Geocoding(WeatherError),
    Forecast(WeatherError),
    Location(LocationError),
    NotInitialized,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Geocoding(e) => write!(f, "Geocoding error: {}", e),
            ServiceError::Forecast(e) => write!(f, "Forecast error: {}", e),
            ServiceError::Location(e) => write!(f, "Location error: {}", e),
            ServiceError::NotInitialized => write!(f, "Async runtime not initialized"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Messages sent from async operations back to the controller
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// A loading step finished and the next one started
    Progress {
        token: RequestToken,
        status: &'static str,
    },
    /// Result of a search, coordinate or location fetch
    FetchDone {
        token: RequestToken,
        result: Result<ForecastBundle, ServiceError>,
    },
    /// Autocomplete results for a settled query
    SuggestionsDone {
        token: RequestToken,
        query: String,
        places: Vec<Place>,
    },
    /// The keystroke was superseded, too short or a repeat
    SuggestionsSkipped,
}

impl WeatherServiceMessage {
    /// Every request ends with exactly one final message.
    pub fn is_final(&self) -> bool {
        !matches!(self, WeatherServiceMessage::Progress { .. })
    }
}

fn runtime_or_fail(
    tx: &UnboundedSender<WeatherServiceMessage>,
    token: RequestToken,
) -> Option<tokio::runtime::Handle> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Some(handle),
        Err(_) => {
            let _ = tx.send(WeatherServiceMessage::FetchDone {
                token,
                result: Err(ServiceError::NotInitialized),
            });
            None
        }
    }
}

async fn fetch(client: &WeatherClient, place: &Place) -> Result<ForecastBundle, ServiceError> {
    client
        .fetch_bundle(place)
        .await
        .map_err(ServiceError::Forecast)
}

/// Geocode `query`, then fetch the forecast for the first match.
/// Sends `Progress` once coordinates are known and `FetchDone` at the end.
pub fn request_search(
    tx: &UnboundedSender<WeatherServiceMessage>,
    client: Arc<WeatherClient>,
    token: RequestToken,
    query: String,
) {
    let tx = tx.clone();
    let Some(runtime) = runtime_or_fail(&tx, token) else {
        return;
    };

    runtime.spawn(async move {
        let place = match client.resolve_place(&query).await {
            Ok(place) => {
                tracing::info!("Resolved '{}' to {}", query, place.display_name);
                place
            }
            Err(e) => {
                let _ = tx.send(WeatherServiceMessage::FetchDone {
                    token,
                    result: Err(ServiceError::Geocoding(e)),
                });
                return;
            }
        };

        let _ = tx.send(WeatherServiceMessage::Progress {
            token,
            status: status::FETCHING_FORECAST,
        });
        let result = fetch(&client, &place).await;
        let _ = tx.send(WeatherServiceMessage::FetchDone { token, result });
    });
}

/// Fetch the forecast for an already resolved place.
pub fn request_fetch(
    tx: &UnboundedSender<WeatherServiceMessage>,
    client: Arc<WeatherClient>,
    token: RequestToken,
    place: Place,
) {
    let tx = tx.clone();
    let Some(runtime) = runtime_or_fail(&tx, token) else {
        return;
    };

    runtime.spawn(async move {
        let result = fetch(&client, &place).await;
        let _ = tx.send(WeatherServiceMessage::FetchDone { token, result });
    });
}

/// Locate the user, name the position, then fetch its forecast.
///
/// A failed reverse lookup is not fatal: the place is labelled with its
/// coordinates instead.
pub fn request_locate<P>(
    tx: &UnboundedSender<WeatherServiceMessage>,
    client: Arc<WeatherClient>,
    geolocator: Arc<Geolocator<P>>,
    token: RequestToken,
) where
    P: LocationProvider + 'static,
{
    let tx = tx.clone();
    let Some(runtime) = runtime_or_fail(&tx, token) else {
        return;
    };

    runtime.spawn(async move {
        let coords = match geolocator.locate().await {
            Ok(coords) => coords,
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                let _ = tx.send(WeatherServiceMessage::FetchDone {
                    token,
                    result: Err(ServiceError::Location(e)),
                });
                return;
            }
        };

        let _ = tx.send(WeatherServiceMessage::Progress {
            token,
            status: status::RESOLVING_PLACE_NAME,
        });
        let place = name_position(&client, coords).await;

        let _ = tx.send(WeatherServiceMessage::Progress {
            token,
            status: status::FETCHING_FORECAST,
        });
        let result = fetch(&client, &place).await;
        let _ = tx.send(WeatherServiceMessage::FetchDone { token, result });
    });
}

async fn name_position(client: &WeatherClient, coords: Coordinates) -> Place {
    match client.reverse_geocode(coords).await {
        Ok(reverse) => Place::new(reverse.display_name(), coords),
        Err(e) => {
            tracing::warn!("Reverse geocoding failed, using coordinates: {}", e);
            Place::new(coords.label(), coords)
        }
    }
}

/// Debounce one keystroke and, if it survives, look up suggestions.
/// Lookup failures yield an empty list; autocomplete never reports errors.
pub fn request_suggestions(
    tx: &UnboundedSender<WeatherServiceMessage>,
    client: Arc<WeatherClient>,
    debouncer: Arc<Debouncer>,
    token: RequestToken,
    text: String,
) {
    let tx = tx.clone();
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        let _ = tx.send(WeatherServiceMessage::SuggestionsSkipped);
        return;
    };

    runtime.spawn(async move {
        let Some(query) = debouncer.settle(&text).await else {
            let _ = tx.send(WeatherServiceMessage::SuggestionsSkipped);
            return;
        };

        let places = match client.search_places(&query).await {
            Ok(places) => places,
            Err(e) => {
                tracing::debug!("Suggestion lookup failed for '{}': {}", query, e);
                Vec::new()
            }
        };
        let _ = tx.send(WeatherServiceMessage::SuggestionsDone {
            token,
            query,
            places,
        });
    });
}
