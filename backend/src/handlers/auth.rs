//! Account handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::services::AccountService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "username_rules")]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

fn username_rules(username: &str) -> Result<(), ValidationError> {
    shared::validation::validate_username(username).map_err(|message| {
        let mut err = ValidationError::new("username");
        err.message = Some(message.into());
        err
    })
}

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    body.validate()?;

    let service = AccountService::new(state.db.clone(), &state.config);
    let farmer = service.register(body.username.trim(), &body.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: farmer.id.to_string(),
            username: farmer.username,
            message: "Registration successful! Please log in.".to_string(),
        }),
    ))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = body.username.trim();
    let service = AccountService::new(state.db.clone(), &state.config);
    let tokens = service.login(username, &body.password).await?;

    Ok(Json(LoginResponse {
        username: username.to_string(),
        access_token: tokens.access_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            username: "ramesh".to_string(),
            password: "secret1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_password = RegisterRequest {
            username: "ramesh".to_string(),
            password: "abc".to_string(),
        };
        assert!(short_password.validate().is_err());

        let spaced = RegisterRequest {
            username: "ram esh".to_string(),
            password: "secret1".to_string(),
        };
        let errors = spaced.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }
}
