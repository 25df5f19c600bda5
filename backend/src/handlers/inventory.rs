//! HTTP handlers for crop and pesticide inventory endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{
    crop_csv_rows, pesticide_csv_rows, AddCropInput, AddPesticideInput, InventoryService,
};
use crate::AppState;
use shared::models::{crop_catalog, CatalogCrop, CropInventorySummary, CropRecord, PesticideRecord};

#[derive(Debug, Deserialize, Validate)]
pub struct AddCropRequest {
    #[validate(length(min = 1, message = "Crop name is required"))]
    pub crop: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPesticideRequest {
    #[validate(length(min = 1, message = "Pesticide name is required"))]
    pub pesticide: String,
    pub quantity: Decimal,
}

/// Add a crop entry
pub async fn add_crop(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<AddCropRequest>,
) -> AppResult<(StatusCode, Json<CropRecord>)> {
    body.validate()?;

    let service = InventoryService::new(state.db);
    let record = service
        .add_crop(
            &current_user.0.username,
            AddCropInput {
                crop: body.crop,
                quantity: body.quantity,
                price: body.price,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Crop entries with total inventory value
pub async fn list_crops(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<CropInventorySummary>> {
    let service = InventoryService::new(state.db);
    let summary = service.crop_summary(&current_user.0.username).await?;
    Ok(Json(summary))
}

/// Crops with their default market prices
pub async fn get_crop_catalog() -> Json<Vec<CatalogCrop>> {
    Json(crop_catalog())
}

/// Download the crop list as CSV
pub async fn export_crops(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let service = InventoryService::new(state.db);
    let records = service.list_crops(&current_user.0.username).await?;
    let csv = InventoryService::export_to_csv(&crop_csv_rows(&records))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"crop_inventory.csv\""),
        ],
        csv,
    ))
}

/// Add a pesticide entry
pub async fn add_pesticide(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<AddPesticideRequest>,
) -> AppResult<(StatusCode, Json<PesticideRecord>)> {
    body.validate()?;

    let service = InventoryService::new(state.db);
    let record = service
        .add_pesticide(
            &current_user.0.username,
            AddPesticideInput {
                pesticide: body.pesticide,
                quantity: body.quantity,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Pesticide entries in insertion order
pub async fn list_pesticides(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<PesticideRecord>>> {
    let service = InventoryService::new(state.db);
    let records = service.list_pesticides(&current_user.0.username).await?;
    Ok(Json(records))
}

/// Download the pesticide list as CSV
pub async fn export_pesticides(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let service = InventoryService::new(state.db);
    let records = service.list_pesticides(&current_user.0.username).await?;
    let csv = InventoryService::export_to_csv(&pesticide_csv_rows(&records))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"pesticide_inventory.csv\""),
        ],
        csv,
    ))
}
