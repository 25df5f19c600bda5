//! Inventory service for a farmer's crop and pesticide stock lists

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{default_crop_price, CropInventorySummary, CropRecord, PesticideRecord};
use shared::validation::{validate_non_negative, validate_present};

/// Inventory service
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct CropRow {
    id: Uuid,
    username: String,
    crop: String,
    quantity: Decimal,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<CropRow> for CropRecord {
    fn from(row: CropRow) -> Self {
        CropRecord {
            id: row.id,
            username: row.username,
            crop: row.crop,
            quantity: row.quantity,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PesticideRow {
    id: Uuid,
    username: String,
    pesticide: String,
    quantity: Decimal,
    created_at: DateTime<Utc>,
}

impl From<PesticideRow> for PesticideRecord {
    fn from(row: PesticideRow) -> Self {
        PesticideRecord {
            id: row.id,
            username: row.username,
            pesticide: row.pesticide,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

/// Input for adding a crop entry
#[derive(Debug, Clone, Deserialize)]
pub struct AddCropInput {
    pub crop: String,
    pub quantity: Decimal,
    /// Falls back to the catalog default when absent
    pub price: Option<Decimal>,
}

/// Input for adding a pesticide entry
#[derive(Debug, Clone, Deserialize)]
pub struct AddPesticideInput {
    pub pesticide: String,
    pub quantity: Decimal,
}

/// Flat CSV row for crop export
#[derive(Debug, Serialize)]
pub struct CropCsvRow<'a> {
    pub crop: &'a str,
    pub quantity: Decimal,
    pub price: Decimal,
    pub value: Decimal,
    pub added_at: String,
}

/// Flat CSV row for pesticide export
#[derive(Debug, Serialize)]
pub struct PesticideCsvRow<'a> {
    pub pesticide: &'a str,
    pub quantity: Decimal,
    pub added_at: String,
}

impl InventoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append a crop entry for a farmer
    pub async fn add_crop(&self, username: &str, input: AddCropInput) -> AppResult<CropRecord> {
        let (crop, quantity, price) = resolve_crop_entry(input)?;

        let row = sqlx::query_as::<_, CropRow>(
            r#"
            INSERT INTO crop_inventory (username, crop, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, crop, quantity, price, created_at
            "#,
        )
        .bind(username)
        .bind(&crop)
        .bind(quantity)
        .bind(price)
        .fetch_one(&self.db)
        .await?;

        tracing::debug!("{} added {} kg of {}", username, quantity, crop);
        Ok(row.into())
    }

    /// A farmer's crop entries in insertion order
    pub async fn list_crops(&self, username: &str) -> AppResult<Vec<CropRecord>> {
        let rows = sqlx::query_as::<_, CropRow>(
            r#"
            SELECT id, username, crop, quantity, price, created_at
            FROM crop_inventory
            WHERE username = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(username)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CropRecord::from).collect())
    }

    /// Crop entries with total inventory value
    pub async fn crop_summary(&self, username: &str) -> AppResult<CropInventorySummary> {
        let records = self.list_crops(username).await?;
        Ok(CropInventorySummary::new(records))
    }

    /// Append a pesticide entry for a farmer
    pub async fn add_pesticide(
        &self,
        username: &str,
        input: AddPesticideInput,
    ) -> AppResult<PesticideRecord> {
        let pesticide = input.pesticide.trim().to_string();
        validate_present(&pesticide).map_err(|message| AppError::Validation {
            field: "pesticide".to_string(),
            message: message.to_string(),
        })?;
        validate_non_negative(input.quantity).map_err(|message| AppError::Validation {
            field: "quantity".to_string(),
            message: message.to_string(),
        })?;

        let row = sqlx::query_as::<_, PesticideRow>(
            r#"
            INSERT INTO pesticide_inventory (username, pesticide, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, username, pesticide, quantity, created_at
            "#,
        )
        .bind(username)
        .bind(&pesticide)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// A farmer's pesticide entries in insertion order
    pub async fn list_pesticides(&self, username: &str) -> AppResult<Vec<PesticideRecord>> {
        let rows = sqlx::query_as::<_, PesticideRow>(
            r#"
            SELECT id, username, pesticide, quantity, created_at
            FROM pesticide_inventory
            WHERE username = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(username)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(PesticideRecord::from).collect())
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}

/// Validate a crop entry and fill in the catalog price
pub fn resolve_crop_entry(input: AddCropInput) -> AppResult<(String, Decimal, Decimal)> {
    let crop = input.crop.trim().to_string();
    validate_present(&crop).map_err(|message| AppError::Validation {
        field: "crop".to_string(),
        message: message.to_string(),
    })?;
    validate_non_negative(input.quantity).map_err(|message| AppError::Validation {
        field: "quantity".to_string(),
        message: message.to_string(),
    })?;

    let price = match input.price {
        Some(price) => price,
        None => default_crop_price(&crop).ok_or_else(|| AppError::Validation {
            field: "price".to_string(),
            message: format!("No default price for '{}'; enter a price", crop),
        })?,
    };
    validate_non_negative(price).map_err(|message| AppError::Validation {
        field: "price".to_string(),
        message: message.to_string(),
    })?;

    Ok((crop, input.quantity, price))
}

/// CSV rows for a crop list
pub fn crop_csv_rows(records: &[CropRecord]) -> Vec<CropCsvRow<'_>> {
    records
        .iter()
        .map(|r| CropCsvRow {
            crop: &r.crop,
            quantity: r.quantity,
            price: r.price,
            value: r.value(),
            added_at: r.created_at.to_rfc3339(),
        })
        .collect()
}

/// CSV rows for a pesticide list
pub fn pesticide_csv_rows(records: &[PesticideRecord]) -> Vec<PesticideCsvRow<'_>> {
    records
        .iter()
        .map(|r| PesticideCsvRow {
            pesticide: &r.pesticide,
            quantity: r.quantity,
            added_at: r.created_at.to_rfc3339(),
        })
        .collect()
}
