//! Nearby agro-shop lookup over the Overpass API (OpenStreetMap)

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;

use super::{read_json, Geocoder, SourceError};
use shared::models::{Shop, ShopCandidate};
use shared::types::ADDRESS_NOT_AVAILABLE;

const SERVICE: &str = "shops";

/// Default search radius around a location (meters)
pub const DEFAULT_RADIUS_METERS: u32 = 10_000;

/// Overpass client filtering shop nodes down to agriculture suppliers
#[derive(Clone)]
pub struct ShopLocator {
    client: Client,
    base_url: String,
    geocoder: Geocoder,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl ShopLocator {
    /// `geocoder` resolves addresses for shops whose tags carry none
    pub fn new(client: Client, base_url: impl Into<String>, geocoder: Geocoder) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            geocoder,
        }
    }

    /// Agriculture-related shops within `radius_meters`, in the order the
    /// source returned them. An empty list is a valid result.
    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> Result<Vec<Shop>, SourceError> {
        let response = self
            .client
            .post(&self.base_url)
            .body(overpass_query(latitude, longitude, radius_meters))
            .send()
            .await;

        let data: OverpassResponse = read_json(SERVICE, response).await?;
        tracing::debug!(
            "Overpass returned {} shop nodes around {}, {}",
            data.elements.len(),
            latitude,
            longitude
        );

        let mut shops = Vec::new();
        for element in data.elements {
            let Some(candidate) = ShopCandidate::from_tags(&element.tags) else {
                continue;
            };

            let address = match candidate.address {
                Some(address) => address,
                None => self.fallback_address(element.lat, element.lon).await,
            };
            shops.push(Shop {
                name: candidate.name,
                category: candidate.category,
                address,
            });
        }

        Ok(shops)
    }

    async fn fallback_address(&self, latitude: Option<f64>, longitude: Option<f64>) -> String {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => self.geocoder.reverse_resolve(lat, lon).await,
            _ => ADDRESS_NOT_AVAILABLE.to_string(),
        }
    }
}

/// Overpass QL selecting every node tagged `shop` within the radius
pub fn overpass_query(latitude: f64, longitude: f64, radius_meters: u32) -> String {
    format!(
        "[out:json];\nnode(around:{}, {}, {})[\"shop\"];\nout body;",
        radius_meters, latitude, longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overpass_query() {
        assert_eq!(
            overpass_query(19.07, 72.87, 10_000),
            "[out:json];\nnode(around:10000, 19.07, 72.87)[\"shop\"];\nout body;"
        );
    }
}
