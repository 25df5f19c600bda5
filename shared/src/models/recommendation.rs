//! Rule-based irrigation, fertilizer and pesticide recommendations
//!
//! Every recommendation is a pure function of the weather snapshot, the
//! vegetation index and the soil category observed for one request.

use serde::{Deserialize, Serialize};

use super::soil::SoilCategory;
use super::vegetation::{VegetationBand, VegetationIndex};
use super::weather::WeatherSnapshot;

/// Daily irrigation at the reference temperature with no rain (mm)
pub const BASELINE_IRRIGATION_MM: f64 = 25.0;
/// Temperature at which the baseline applies (°C)
pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;
/// Number of trailing hourly slots averaged as expected rain
pub const RAIN_WINDOW_HOURS: usize = 3;

/// Display tier of an irrigation volume
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationTier {
    /// > 40 mm
    High,
    /// > 10 mm and <= 40 mm
    Moderate,
    /// <= 10 mm
    Low,
}

impl IrrigationTier {
    pub fn from_volume(volume_mm: f64) -> Self {
        if volume_mm > 40.0 {
            IrrigationTier::High
        } else if volume_mm > 10.0 {
            IrrigationTier::Moderate
        } else {
            IrrigationTier::Low
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IrrigationTier::High => "High water requirement! Your crop is stressed.",
            IrrigationTier::Moderate => "Moderate water requirement.",
            IrrigationTier::Low => "Low water requirement.",
        }
    }
}

/// Irrigation recommendation together with the inputs it was derived from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IrrigationAdvice {
    pub temperature: f64,
    pub current_precipitation: f64,
    pub average_rain_mm: f64,
    pub volume_mm: f64,
    pub tier: IrrigationTier,
    pub message: String,
}

impl IrrigationAdvice {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let average_rain_mm = average_recent_rain(
            &snapshot.hourly_precipitation,
            snapshot.current_precipitation,
        );
        let volume_mm = irrigation_volume(snapshot.temperature, average_rain_mm);
        let tier = IrrigationTier::from_volume(volume_mm);

        Self {
            temperature: snapshot.temperature,
            current_precipitation: snapshot.current_precipitation,
            average_rain_mm,
            volume_mm,
            tier,
            message: tier.message().to_string(),
        }
    }
}

/// Mean of the last three hourly values, or `current_precipitation` when the
/// series holds fewer than three.
pub fn average_recent_rain(hourly_precipitation: &[f64], current_precipitation: f64) -> f64 {
    if hourly_precipitation.len() < RAIN_WINDOW_HOURS {
        return current_precipitation;
    }

    let tail = &hourly_precipitation[hourly_precipitation.len() - RAIN_WINDOW_HOURS..];
    tail.iter().sum::<f64>() / RAIN_WINDOW_HOURS as f64
}

/// `max(0, 25 + (temperature - 20) - average_rain)` in mm
pub fn irrigation_volume(temperature: f64, average_rain_mm: f64) -> f64 {
    (BASELINE_IRRIGATION_MM + (temperature - REFERENCE_TEMPERATURE_C) - average_rain_mm).max(0.0)
}

/// Recommended irrigation volume (mm) for a temperature and hourly rain series
pub fn recommend_irrigation(
    temperature: f64,
    hourly_precipitation: &[f64],
    current_precipitation: f64,
) -> f64 {
    irrigation_volume(
        temperature,
        average_recent_rain(hourly_precipitation, current_precipitation),
    )
}

/// Fertilizer and pesticide advice for one field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropCareAdvice {
    pub vegetation_index: f64,
    pub vegetation_band: VegetationBand,
    pub soil: SoilCategory,
    pub fertilizer: String,
    pub pesticide: String,
}

impl CropCareAdvice {
    pub fn new(index: VegetationIndex, soil: SoilCategory) -> Self {
        let (fertilizer, pesticide) = recommend_fertilizer_and_pesticide(index.value, soil);
        Self {
            vegetation_index: index.value,
            vegetation_band: index.band(),
            soil,
            fertilizer,
            pesticide,
        }
    }
}

/// Fertilizer (with soil amendment) and pesticide for a vegetation index
pub fn recommend_fertilizer_and_pesticide(
    vegetation_index: f64,
    soil: SoilCategory,
) -> (String, String) {
    let (fertilizer, pesticide) = match VegetationBand::from_value(vegetation_index) {
        VegetationBand::Stressed => (
            "High NPK mix (Urea, DAP, MOP)",
            "Broad-spectrum insecticide (e.g., Chlorpyrifos)",
        ),
        VegetationBand::Moderate => (
            "Moderate NPK mix (Balanced fertilizer)",
            "Targeted pesticide (e.g., Imidacloprid)",
        ),
        VegetationBand::Healthy => ("Minimal fertilizer needed", "No pesticide required"),
    };

    (
        format!("{} {}", fertilizer, soil_amendment(soil)),
        pesticide.to_string(),
    )
}

/// Soil-specific clause appended to the fertilizer advice
pub fn soil_amendment(soil: SoilCategory) -> &'static str {
    match soil {
        SoilCategory::Sandy => "(Add extra organic matter & water)",
        SoilCategory::Clay => "(Ensure drainage, avoid overwatering)",
        SoilCategory::Loamy => "(Balanced approach)",
        SoilCategory::Silty => "(Moderate water-holding capacity)",
    }
}
