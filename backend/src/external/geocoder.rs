//! Place search and reverse geocoding against Nominatim (OpenStreetMap)

use reqwest::Client;
use serde::Deserialize;

use super::{read_json, SourceError};
use shared::types::{Location, ADDRESS_NOT_AVAILABLE};

const SERVICE: &str = "geocoding";

/// Nominatim client
#[derive(Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
}

impl Geocoder {
    /// Create a geocoder constrained to `country` by default
    pub fn new(client: Client, base_url: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country: country.into(),
        }
    }

    /// Resolve a city name inside the configured country
    pub async fn resolve(&self, place_name: &str) -> Result<Location, SourceError> {
        self.resolve_in(place_name, &self.country).await
    }

    /// Resolve a city name inside `country`, taking the first match.
    ///
    /// Any failure, including a non-success status or an empty result set,
    /// is reported as `NotFound`.
    pub async fn resolve_in(&self, place_name: &str, country: &str) -> Result<Location, SourceError> {
        let place_name = place_name.trim();
        if place_name.is_empty() {
            return Err(SourceError::NotFound(String::new()));
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("city", place_name), ("country", country), ("format", "json")])
            .send()
            .await;

        let places: Vec<NominatimPlace> = read_json(SERVICE, response).await.map_err(|e| {
            tracing::debug!("Place search for '{}' failed: {}", place_name, e);
            SourceError::NotFound(place_name.to_string())
        })?;

        let first = places
            .first()
            .ok_or_else(|| SourceError::NotFound(place_name.to_string()))?;

        let latitude = first.lat.parse::<f64>();
        let longitude = first.lon.parse::<f64>();
        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) => {
                tracing::info!("Resolved '{}' to {}, {}", place_name, latitude, longitude);
                Ok(Location::new(place_name, latitude, longitude))
            }
            _ => {
                tracing::debug!("Unparseable coordinates for '{}': {:?}", place_name, first);
                Err(SourceError::NotFound(place_name.to_string()))
            }
        }
    }

    /// Human-readable address for a point.
    ///
    /// Never fails: returns "Address not available" on any upstream problem.
    pub async fn reverse_resolve(&self, latitude: f64, longitude: f64) -> String {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await;

        match read_json::<NominatimReverse>(SERVICE, response).await {
            Ok(body) => body
                .display_name
                .unwrap_or_else(|| ADDRESS_NOT_AVAILABLE.to_string()),
            Err(e) => {
                tracing::debug!("Reverse geocode of {}, {} failed: {}", latitude, longitude, e);
                ADDRESS_NOT_AVAILABLE.to_string()
            }
        }
    }
}
