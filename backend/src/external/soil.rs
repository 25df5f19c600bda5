//! Soil composition client for the ISRIC SoilGrids properties API

use reqwest::Client;
use serde::Deserialize;

use super::{read_json, SourceError};
use shared::models::{SoilCategory, SoilFractions};

const SERVICE: &str = "soil";

/// SoilGrids client
#[derive(Clone)]
pub struct SoilClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsResponse {
    #[serde(default)]
    properties: SoilGridsProperties,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsProperties {
    #[serde(default)]
    layers: Vec<SoilGridsLayer>,
}

#[derive(Debug, Deserialize)]
struct SoilGridsLayer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    depths: Vec<SoilGridsDepth>,
}

#[derive(Debug, Deserialize)]
struct SoilGridsDepth {
    #[serde(default)]
    values: SoilGridsValues,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsValues {
    mean: Option<f64>,
}

impl SoilClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Mean sand/clay/silt fractions at 0-5 cm. Fractions the upstream
    /// leaves out stay `None`.
    pub async fn fetch_fractions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<SoilFractions, SourceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("property", "sand,clay,silt".to_string()),
                ("depth", "0-5cm".to_string()),
            ])
            .send()
            .await;

        let data: SoilGridsResponse = read_json(SERVICE, response).await?;

        Ok(Self::collect_fractions(data))
    }

    /// Classify the soil at a point. Every failure, including a missing
    /// fraction, is reported as `Unknown`.
    pub async fn classify(&self, latitude: f64, longitude: f64) -> Result<SoilCategory, SourceError> {
        let fractions = self
            .fetch_fractions(latitude, longitude)
            .await
            .map_err(|e| SourceError::Unknown(e.to_string()))?;

        fractions.classify().ok_or_else(|| {
            tracing::debug!("Incomplete soil fractions at {}, {}: {:?}", latitude, longitude, fractions);
            SourceError::Unknown("sand, clay or silt fraction missing".to_string())
        })
    }

    /// First depth of each layer; layers without depths or without a mean
    /// are skipped.
    fn collect_fractions(data: SoilGridsResponse) -> SoilFractions {
        let mut fractions = SoilFractions::default();
        for layer in data.properties.layers {
            let mean = layer.depths.first().and_then(|d| d.values.mean);
            if let Some(mean) = mean {
                fractions.record_layer(&layer.name, mean);
            }
        }
        fractions
    }
}
