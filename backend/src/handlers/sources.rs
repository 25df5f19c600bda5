//! Single data source lookups

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::dashboard::{number_shops, NumberedShop};
use crate::AppState;
use shared::models::{SoilCategory, VegetationIndex, WeatherSnapshot};
use shared::types::{Coordinates, Location};

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub lat: f64,
    pub lon: f64,
}

impl PointQuery {
    fn coordinates(&self) -> AppResult<Coordinates> {
        let point = Coordinates::new(self.lat, self.lon);
        if !point.is_valid() {
            let (field, range) = if (-90.0..=90.0).contains(&self.lat) {
                ("lon", "-180 to 180")
            } else {
                ("lat", "-90 to 90")
            };
            return Err(AppError::Validation {
                field: field.to_string(),
                message: format!("{} must be between {}", field, range),
            });
        }
        Ok(point)
    }
}

#[derive(Debug, Deserialize)]
pub struct ShopsQuery {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in meters
    pub radius: Option<u32>,
}

#[derive(Serialize)]
pub struct SoilResponse {
    pub category: SoilCategory,
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub address: String,
}

pub async fn geocode(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<Location>> {
    let location = state.sources.geocoder.resolve(query.city.trim()).await?;
    Ok(Json(location))
}

pub async fn weather(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PointQuery>,
) -> AppResult<Json<WeatherSnapshot>> {
    let point = query.coordinates()?;
    let snapshot = state
        .sources
        .weather
        .fetch_snapshot(point.latitude, point.longitude)
        .await?;
    Ok(Json(snapshot))
}

pub async fn vegetation(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PointQuery>,
) -> AppResult<Json<VegetationIndex>> {
    let point = query.coordinates()?;
    let index = state
        .sources
        .vegetation
        .compute_index(point.latitude, point.longitude, Utc::now().date_naive())
        .await?;
    Ok(Json(index))
}

pub async fn soil(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PointQuery>,
) -> AppResult<Json<SoilResponse>> {
    let point = query.coordinates()?;
    let category = state
        .sources
        .soil
        .classify(point.latitude, point.longitude)
        .await?;
    Ok(Json(SoilResponse { category }))
}

/// Agriculture shops near a point, numbered from 1
pub async fn shops(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ShopsQuery>,
) -> AppResult<Json<Vec<NumberedShop>>> {
    let point = PointQuery {
        lat: query.lat,
        lon: query.lon,
    }
    .coordinates()?;
    let radius = query.radius.unwrap_or(state.sources.shop_radius_meters);

    let shops = state
        .sources
        .shops
        .find_nearby(point.latitude, point.longitude, radius)
        .await?;
    Ok(Json(number_shops(shops)))
}

/// Reverse geocoded address; never fails
pub async fn address(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<PointQuery>,
) -> AppResult<Json<AddressResponse>> {
    let point = query.coordinates()?;
    let address = state
        .sources
        .geocoder
        .reverse_resolve(point.latitude, point.longitude)
        .await;
    Ok(Json(AddressResponse { address }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_field(lat: f64, lon: f64) -> Option<String> {
        match (PointQuery { lat, lon }).coordinates() {
            Err(AppError::Validation { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_out_of_range_field_is_named() {
        assert_eq!(failed_field(19.99, 200.0).as_deref(), Some("lon"));
        assert_eq!(failed_field(95.0, 73.79).as_deref(), Some("lat"));
        assert_eq!(failed_field(95.0, 200.0).as_deref(), Some("lat"));
        assert_eq!(failed_field(19.99, 73.79), None);
    }
}
