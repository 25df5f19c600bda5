//! Weather API client for fetching forecast data
//!
//! Integrates with Open-Meteo for current conditions and the hourly
//! precipitation series

use reqwest::Client;
use serde::Deserialize;

use super::{read_json, SourceError};
use shared::models::WeatherSnapshot;

const SERVICE: &str = "weather";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    timezone: String,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeatherBlock,
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherBlock {
    temperature: f64,
    time: String,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    precipitation: Vec<Option<f64>>,
}

impl WeatherClient {
    /// Create a new WeatherClient labelling hourly slots in `timezone`
    pub fn new(client: Client, base_url: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timezone: timezone.into(),
        }
    }

    /// Fetch current temperature and the hourly precipitation series
    pub async fn fetch_snapshot(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, SourceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
                ("hourly", "precipitation".to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await;

        let data: ForecastResponse = read_json(SERVICE, response).await?;

        Ok(Self::convert_forecast_response(data))
    }

    /// Convert the Open-Meteo response to a snapshot. Null hourly values
    /// count as no rain.
    fn convert_forecast_response(data: ForecastResponse) -> WeatherSnapshot {
        let precipitation = data
            .hourly
            .precipitation
            .into_iter()
            .map(|p| p.unwrap_or(0.0))
            .collect();

        WeatherSnapshot::from_forecast(
            data.current_weather.temperature,
            &data.current_weather.time,
            data.hourly.time,
            precipitation,
        )
    }
}
