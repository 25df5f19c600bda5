//! Dashboard aggregation
//!
//! Resolves a place name and then queries each data source in turn. Only a
//! geocoding failure aborts the request; every other source failure is
//! reported in its own section and the remaining sections are still filled.

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::AppResult;
use crate::external::{
    http_client, service_account::EARTH_ENGINE_SCOPE, EarthEngineClient, FailureKind, Geocoder,
    ServiceAccountKey, SetupError, ShopLocator, SoilClient, SourceError, TokenProvider,
    WeatherClient,
};
use shared::models::{
    CropCareAdvice, IrrigationAdvice, Shop, SoilCategory, VegetationIndex, WeatherSnapshot,
};
use shared::types::Location;

/// All external data source clients, built once at startup
#[derive(Clone)]
pub struct DataSources {
    pub geocoder: Geocoder,
    pub weather: WeatherClient,
    pub vegetation: EarthEngineClient,
    pub soil: SoilClient,
    pub shops: ShopLocator,
    pub shop_radius_meters: u32,
    pub embed_api_key: Option<String>,
}

impl DataSources {
    /// Build every client over one shared HTTP connection pool
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let client = http_client(&config.http)?;
        let geocoder = Geocoder::new(
            client.clone(),
            &config.geocoding.api_endpoint,
            &config.geocoding.country,
        );

        let tokens = if config.earth_engine.credentials_file.is_empty() {
            None
        } else {
            let key = ServiceAccountKey::from_file(&config.earth_engine.credentials_file)?;
            let provider = TokenProvider::new(client.clone(), &key, EARTH_ENGINE_SCOPE)?;
            Some(match &config.earth_engine.token_uri {
                Some(uri) => provider.with_token_uri(uri),
                None => provider,
            })
        };

        Ok(Self {
            weather: WeatherClient::new(
                client.clone(),
                &config.weather.api_endpoint,
                &config.weather.timezone,
            ),
            vegetation: EarthEngineClient::new(
                client.clone(),
                &config.earth_engine.api_endpoint,
                &config.earth_engine.project,
                tokens,
            ),
            soil: SoilClient::new(client.clone(), &config.soil.api_endpoint),
            shops: ShopLocator::new(client, &config.shops.api_endpoint, geocoder.clone()),
            geocoder,
            shop_radius_meters: config.shops.radius_meters,
            embed_api_key: config
                .maps
                .embed_api_key
                .clone()
                .filter(|key| !key.is_empty()),
        })
    }
}

/// Outcome of one dashboard section
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Failed { kind: FailureKind, message: String },
}

impl<T> Section<T> {
    pub fn from_result(section: &str, result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(err) => {
                tracing::warn!("{} section failed: {}", section, err);
                Section::Failed {
                    kind: err.kind(),
                    message: err.to_string(),
                }
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            Section::Failed { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }

    /// A dependent section that was never computed because an input failed
    fn skipped<U>(input: &Section<U>, what: &str) -> Self {
        let kind = match input {
            Section::Failed { kind, .. } => *kind,
            Section::Ready(_) => FailureKind::Unavailable,
        };
        Section::Failed {
            kind,
            message: format!("skipped: {} unavailable", what),
        }
    }
}

/// Where the soil category came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilOrigin {
    Classified,
    Selected,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SoilReading {
    pub category: SoilCategory,
    pub origin: SoilOrigin,
}

/// A shop with its 1-based position in the listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NumberedShop {
    pub no: usize,
    #[serde(flatten)]
    pub shop: Shop,
}

pub fn number_shops(shops: Vec<Shop>) -> Vec<NumberedShop> {
    shops
        .into_iter()
        .enumerate()
        .map(|(i, shop)| NumberedShop { no: i + 1, shop })
        .collect()
}

/// Google Maps satellite embed centered on a point
pub fn satellite_embed_url(api_key: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.google.com/maps/embed/v1/view?key={}&center={},{}&zoom=18&maptype=satellite",
        api_key, latitude, longitude
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct IrrigationView {
    pub location: Location,
    pub weather: Section<WeatherSnapshot>,
    pub irrigation: Section<IrrigationAdvice>,
    pub satellite_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CropCareView {
    pub location: Location,
    pub vegetation: Section<VegetationIndex>,
    pub soil: Section<SoilReading>,
    pub crop_care: Section<CropCareAdvice>,
    pub shops: Section<Vec<NumberedShop>>,
}

/// The full dashboard for one place
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub location: Location,
    pub weather: Section<WeatherSnapshot>,
    pub irrigation: Section<IrrigationAdvice>,
    pub satellite_url: Option<String>,
    pub vegetation: Section<VegetationIndex>,
    pub soil: Section<SoilReading>,
    pub crop_care: Section<CropCareAdvice>,
    pub shops: Section<Vec<NumberedShop>>,
}

/// Dashboard aggregation service
pub struct DashboardService<'a> {
    sources: &'a DataSources,
}

impl<'a> DashboardService<'a> {
    pub fn new(sources: &'a DataSources) -> Self {
        Self { sources }
    }

    /// Resolve a place name; the only failure that aborts a dashboard request
    pub async fn locate(&self, place_name: &str) -> AppResult<Location> {
        Ok(self.sources.geocoder.resolve(place_name).await?)
    }

    pub async fn irrigation(&self, place_name: &str) -> AppResult<IrrigationView> {
        let location = self.locate(place_name).await?;
        let (weather, irrigation) = self.irrigation_sections(&location).await;

        Ok(IrrigationView {
            satellite_url: self.satellite_url(&location),
            location,
            weather,
            irrigation,
        })
    }

    pub async fn crop_care(
        &self,
        place_name: &str,
        soil: Option<SoilCategory>,
    ) -> AppResult<CropCareView> {
        let location = self.locate(place_name).await?;
        let sections = self.crop_care_sections(&location, soil).await;

        Ok(CropCareView {
            location,
            vegetation: sections.vegetation,
            soil: sections.soil,
            crop_care: sections.crop_care,
            shops: sections.shops,
        })
    }

    /// Every section, queried sequentially after geocoding
    pub async fn dashboard(
        &self,
        place_name: &str,
        soil: Option<SoilCategory>,
    ) -> AppResult<Dashboard> {
        let location = self.locate(place_name).await?;
        let (weather, irrigation) = self.irrigation_sections(&location).await;
        let sections = self.crop_care_sections(&location, soil).await;

        Ok(Dashboard {
            satellite_url: self.satellite_url(&location),
            location,
            weather,
            irrigation,
            vegetation: sections.vegetation,
            soil: sections.soil,
            crop_care: sections.crop_care,
            shops: sections.shops,
        })
    }

    async fn irrigation_sections(
        &self,
        location: &Location,
    ) -> (Section<WeatherSnapshot>, Section<IrrigationAdvice>) {
        let weather = Section::from_result(
            "weather",
            self.sources
                .weather
                .fetch_snapshot(location.latitude, location.longitude)
                .await,
        );
        let irrigation = match weather.ready() {
            Some(snapshot) => Section::Ready(IrrigationAdvice::from_snapshot(snapshot)),
            None => Section::skipped(&weather, "weather"),
        };
        (weather, irrigation)
    }

    async fn crop_care_sections(
        &self,
        location: &Location,
        soil: Option<SoilCategory>,
    ) -> CropCareSections {
        let (lat, lon) = (location.latitude, location.longitude);

        let vegetation = Section::from_result(
            "vegetation",
            self.sources
                .vegetation
                .compute_index(lat, lon, Utc::now().date_naive())
                .await,
        );

        let soil = match soil {
            Some(category) => Section::Ready(SoilReading {
                category,
                origin: SoilOrigin::Selected,
            }),
            None => Section::from_result(
                "soil",
                self.sources.soil.classify(lat, lon).await.map(|category| SoilReading {
                    category,
                    origin: SoilOrigin::Classified,
                }),
            ),
        };

        let crop_care = match (vegetation.ready(), soil.ready()) {
            (Some(index), Some(reading)) => {
                Section::Ready(CropCareAdvice::new(*index, reading.category))
            }
            (None, _) => Section::skipped(&vegetation, "vegetation index"),
            (_, None) => Section::skipped(&soil, "soil type"),
        };

        let shops = Section::from_result(
            "shops",
            self.sources
                .shops
                .find_nearby(lat, lon, self.sources.shop_radius_meters)
                .await
                .map(number_shops),
        );

        CropCareSections {
            vegetation,
            soil,
            crop_care,
            shops,
        }
    }

    fn satellite_url(&self, location: &Location) -> Option<String> {
        self.sources
            .embed_api_key
            .as_deref()
            .map(|key| satellite_embed_url(key, location.latitude, location.longitude))
    }
}

struct CropCareSections {
    vegetation: Section<VegetationIndex>,
    soil: Section<SoilReading>,
    crop_care: Section<CropCareAdvice>,
    shops: Section<Vec<NumberedShop>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_serialization() {
        let ready: Section<f64> = Section::Ready(0.62);
        assert_eq!(
            serde_json::to_value(&ready).unwrap(),
            json!({"status": "ready", "data": 0.62})
        );

        let failed: Section<f64> =
            Section::from_result("weather", Err(SourceError::unavailable("weather", "HTTP 502")));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["data"]["kind"], "unavailable");
    }

    #[test]
    fn test_skipped_inherits_failure_kind() {
        let soil: Section<SoilReading> =
            Section::from_result("soil", Err(SourceError::Unknown("clay missing".into())));
        let advice: Section<CropCareAdvice> = Section::skipped(&soil, "soil type");
        assert_eq!(
            advice,
            Section::Failed {
                kind: FailureKind::Unknown,
                message: "skipped: soil type unavailable".to_string(),
            }
        );
    }

    #[test]
    fn test_shops_numbered_from_one() {
        let shops = vec![
            Shop {
                name: "Krishna Agro Center".into(),
                category: "agrarian".into(),
                address: "MG Road".into(),
            },
            Shop {
                name: "Green Garden Supplies".into(),
                category: "garden_centre".into(),
                address: "Address not available".into(),
            },
        ];
        let numbered = number_shops(shops);
        assert_eq!(numbered[0].no, 1);
        assert_eq!(numbered[1].no, 2);

        let value = serde_json::to_value(&numbered[1]).unwrap();
        assert_eq!(value["no"], 2);
        assert_eq!(value["name"], "Green Garden Supplies");
    }

    #[test]
    fn test_satellite_embed_url() {
        assert_eq!(
            satellite_embed_url("KEY", 19.9975, 73.7898),
            "https://www.google.com/maps/embed/v1/view?key=KEY&center=19.9975,73.7898&zoom=18&maptype=satellite"
        );
    }
}
