//! Dashboard handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::dashboard::{CropCareView, Dashboard, DashboardService, IrrigationView};
use crate::AppState;
use shared::models::SoilCategory;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub city: Option<String>,
    /// Farmer-selected soil type, overrides classification
    pub soil: Option<String>,
}

impl DashboardQuery {
    fn city(&self) -> AppResult<&str> {
        let city = self.city.as_deref().unwrap_or_default().trim();
        if city.is_empty() {
            return Err(AppError::Validation {
                field: "city".to_string(),
                message: "Enter a city name".to_string(),
            });
        }
        Ok(city)
    }

    fn soil(&self) -> AppResult<Option<SoilCategory>> {
        match self.soil.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|e| AppError::Validation {
                field: "soil".to_string(),
                message: format!("{}", e),
            }),
        }
    }
}

/// Full dashboard for a city
pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<Dashboard>> {
    let city = query.city()?;
    let soil = query.soil()?;
    tracing::debug!("{} requested dashboard for {}", current_user.0.username, city);

    let dashboard = DashboardService::new(&state.sources)
        .dashboard(city, soil)
        .await?;

    if !dashboard.crop_care.is_ready() {
        tracing::info!("No crop care advice for {}", city);
    }
    Ok(Json(dashboard))
}

/// Weather and irrigation advice for a city
pub async fn get_irrigation(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<IrrigationView>> {
    let view = DashboardService::new(&state.sources)
        .irrigation(query.city()?)
        .await?;
    Ok(Json(view))
}

/// Vegetation, soil, fertilizer and pesticide advice plus nearby shops
pub async fn get_crop_care(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<CropCareView>> {
    let soil = query.soil()?;
    let view = DashboardService::new(&state.sources)
        .crop_care(query.city()?, soil)
        .await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(city: &str, soil: Option<&str>) -> DashboardQuery {
        DashboardQuery {
            city: Some(city.to_string()),
            soil: soil.map(str::to_string),
        }
    }

    #[test]
    fn test_blank_city_rejected() {
        assert!(query("  ", None).city().is_err());
        let missing = DashboardQuery {
            city: None,
            soil: None,
        };
        assert!(matches!(
            missing.city(),
            Err(AppError::Validation { ref field, .. }) if field == "city"
        ));
        assert_eq!(query(" Nashik ", None).city().unwrap(), "Nashik");
    }

    #[test]
    fn test_soil_override_parsing() {
        assert_eq!(query("Nashik", None).soil().unwrap(), None);
        assert_eq!(query("Nashik", Some("")).soil().unwrap(), None);
        assert_eq!(
            query("Nashik", Some("clay")).soil().unwrap(),
            Some(SoilCategory::Clay)
        );
        assert!(query("Nashik", Some("peat")).soil().is_err());
    }
}
