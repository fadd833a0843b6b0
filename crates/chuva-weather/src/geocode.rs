//! Place search (Open-Meteo geocoding) and reverse geocoding (Nominatim).

use serde::Deserialize;
use tracing::instrument;

use crate::client::{handle_response, WeatherClient};
use crate::types::{Coordinates, Place, ReversePlace, WeatherError};

/// Name used when Nominatim knows the address but not a settlement
const UNNAMED_PLACE: &str = "Localização atual";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    admin1: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
    timezone: Option<String>,
}

impl From<SearchResult> for Place {
    fn from(r: SearchResult) -> Self {
        let display_name = [Some(r.name), r.admin1, r.country]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Place {
            display_name,
            latitude: r.latitude,
            longitude: r.longitude,
            timezone: r.timezone.unwrap_or_else(|| "auto".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    country: Option<String>,
}

impl WeatherClient {
    /// Search places by name. An empty result means "not found", not an error.
    #[instrument(skip(self), level = "info")]
    pub async fn search_places(&self, query: &str) -> Result<Vec<Place>, WeatherError> {
        let response = self
            .client
            .get(&self.options.endpoints.geocoding)
            .query(&[
                ("name", query.to_string()),
                ("count", self.options.result_limit.to_string()),
                ("language", self.options.language.clone()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        let body: SearchResponse = handle_response(response).await?;
        let places: Vec<Place> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Place::from)
            .collect();

        tracing::debug!("Geocoding returned {} results", places.len());
        Ok(places)
    }

    /// First match for `query`, or [`WeatherError::PlaceNotFound`].
    pub async fn resolve_place(&self, query: &str) -> Result<Place, WeatherError> {
        self.search_places(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::PlaceNotFound(query.to_string()))
    }

    /// Reverse geocode coordinates to a place name and country.
    /// Callers fall back to showing the coordinates on failure.
    #[instrument(skip(self), level = "info")]
    pub async fn reverse_geocode(&self, coords: Coordinates) -> Result<ReversePlace, WeatherError> {
        let response = self
            .client
            .get(&self.options.endpoints.reverse_geocoding)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        let body: NominatimResponse = handle_response(response).await?;

        if let Some(error) = body.error {
            return Err(WeatherError::Service(error));
        }

        let addr = body
            .address
            .ok_or_else(|| WeatherError::Parse("reverse geocode without address".to_string()))?;

        let name = addr
            .city
            .or(addr.town)
            .or(addr.village)
            .or(addr.hamlet)
            .unwrap_or_else(|| UNNAMED_PLACE.to_string());

        let place = ReversePlace {
            name,
            country: addr.country,
        };
        tracing::info!("Reverse geocoded to: {}", place.display_name());
        Ok(place)
    }
}
