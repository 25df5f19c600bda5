//! Crop and pesticide inventory models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Crops offered for bookkeeping with their default market price per kg
pub const CROP_CATALOG: [(&str, i64); 5] = [
    ("Wheat", 20),
    ("Rice", 25),
    ("Maize", 18),
    ("Sugarcane", 30),
    ("Cotton", 40),
];

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogCrop {
    pub crop: String,
    pub default_price: Decimal,
}

/// All catalog entries in display order
pub fn crop_catalog() -> Vec<CatalogCrop> {
    CROP_CATALOG
        .iter()
        .map(|(crop, price)| CatalogCrop {
            crop: crop.to_string(),
            default_price: Decimal::from(*price),
        })
        .collect()
}

/// Default market price for a catalog crop (case-insensitive)
pub fn default_crop_price(crop: &str) -> Option<Decimal> {
    CROP_CATALOG
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(crop.trim()))
        .map(|(_, price)| Decimal::from(*price))
}

/// A crop stock entry owned by one farmer. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropRecord {
    pub id: Uuid,
    pub username: String,
    pub crop: String,
    /// Quantity in kg
    pub quantity: Decimal,
    /// Market price per kg
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl CropRecord {
    pub fn value(&self) -> Decimal {
        self.quantity * self.price
    }
}

/// A pesticide stock entry owned by one farmer. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PesticideRecord {
    pub id: Uuid,
    pub username: String,
    pub pesticide: String,
    /// Quantity in liters or kg
    pub quantity: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Crop inventory listing with its total value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropInventorySummary {
    pub records: Vec<CropRecord>,
    pub total_value: Decimal,
}

impl CropInventorySummary {
    pub fn new(records: Vec<CropRecord>) -> Self {
        let total_value = inventory_value(&records);
        Self {
            records,
            total_value,
        }
    }
}

/// Sum of quantity x price over all records
pub fn inventory_value(records: &[CropRecord]) -> Decimal {
    records.iter().map(CropRecord::value).sum()
}
