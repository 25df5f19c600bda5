//! Vegetation index models

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::Coordinates;

/// Sentinel-2 multispectral collection queried for the index
pub const SCENE_COLLECTION: &str = "COPERNICUS/S2";
/// Near-infrared band
pub const NIR_BAND: &str = "B8";
/// Red band
pub const RED_BAND: &str = "B4";
/// Scene metadata property holding the cloudy pixel percentage
pub const CLOUD_PROPERTY: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Regional vegetation health index, a normalized difference in [-1, 1]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VegetationIndex {
    pub value: f64,
}

impl VegetationIndex {
    /// Wrap a raw scalar, rejecting NaN and anything outside [-1, 1]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (-1.0..=1.0).contains(&value) {
            Some(Self { value })
        } else {
            None
        }
    }

    pub fn band(&self) -> VegetationBand {
        VegetationBand::from_value(self.value)
    }
}

/// Vegetation vigor bands driving fertilizer and pesticide advice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VegetationBand {
    /// index < 0.5
    Stressed,
    /// 0.5 <= index < 0.7
    Moderate,
    /// index >= 0.7
    Healthy,
}

impl VegetationBand {
    pub fn from_value(value: f64) -> Self {
        if value < 0.5 {
            VegetationBand::Stressed
        } else if value < 0.7 {
            VegetationBand::Moderate
        } else {
            VegetationBand::Healthy
        }
    }
}

/// Parameters of one vegetation index computation.
///
/// A circular region around `center`, scenes from the trailing window with
/// cloud cover strictly below `max_cloud_percent`, per-scene normalized
/// difference of NIR and red, per-pixel median composite, then a spatial mean
/// over the region at `scale_meters`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VegetationQuery {
    pub center: Coordinates,
    pub radius_meters: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_cloud_percent: f64,
    pub collection: String,
    pub nir_band: String,
    pub red_band: String,
    pub scale_meters: f64,
}

impl VegetationQuery {
    pub const RADIUS_METERS: f64 = 5000.0;
    pub const WINDOW_DAYS: i64 = 30;
    pub const MAX_CLOUD_PERCENT: f64 = 20.0;
    pub const SCALE_METERS: f64 = 30.0;

    /// Standard query: 5 km radius, 30 days ending at `as_of`
    pub fn trailing_window(center: Coordinates, as_of: NaiveDate) -> Self {
        Self {
            center,
            radius_meters: Self::RADIUS_METERS,
            start_date: as_of - Duration::days(Self::WINDOW_DAYS),
            end_date: as_of,
            max_cloud_percent: Self::MAX_CLOUD_PERCENT,
            collection: SCENE_COLLECTION.to_string(),
            nir_band: NIR_BAND.to_string(),
            red_band: RED_BAND.to_string(),
            scale_meters: Self::SCALE_METERS,
        }
    }
}
