//! Account service for farmer registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::{Config, JwtConfig};
use crate::error::{AppError, AppResult};
use shared::models::Farmer;

/// Account service
#[derive(Clone)]
pub struct AccountService {
    db: PgPool,
    tokens: TokenIssuer,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// Access token handed out on login
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Farmer row including the password hash
#[derive(Debug, sqlx::FromRow)]
struct FarmerRow {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

/// Signs and validates HS256 access tokens
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiry_secs: i64,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            expiry_secs: config.access_token_expiry,
        }
    }

    /// Issue an access token for a username
    pub fn issue(&self, username: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + Duration::seconds(self.expiry_secs)).timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.expiry_secs,
        })
    }

    /// Validate an access token and return its claims
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

impl AccountService {
    /// Create a new AccountService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            tokens: TokenIssuer::new(&config.jwt),
        }
    }

    /// Register a new farmer account
    pub async fn register(&self, username: &str, password: &str) -> AppResult<Farmer> {
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farmers WHERE username = $1")
                .bind(username)
                .fetch_one(&self.db)
                .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "username".to_string(),
                message: "Username already exists.".to_string(),
            });
        }

        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let (id, username, created_at) = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>)>(
            r#"
            INSERT INTO farmers (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict {
                resource: "username".to_string(),
                message: "Username already exists.".to_string(),
            },
            other => AppError::DatabaseError(other),
        })?;

        tracing::info!("Registered farmer {}", username);
        Ok(Farmer {
            id,
            username,
            created_at,
        })
    }

    /// Authenticate a farmer with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthTokens> {
        let row = sqlx::query_as::<_, FarmerRow>(
            "SELECT id, username, password_hash, created_at FROM farmers WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::debug!("Failed login for {}", username);
            return Err(AppError::InvalidCredentials);
        }

        tracing::debug!(
            "Farmer {} ({}) logged in, registered {}",
            row.username,
            row.id,
            row.created_at
        );
        self.tokens.issue(&row.username)
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.validate(token)
    }
}
