//! Configuration management for the Agrinfo dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with AGRINFO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Outbound HTTP settings shared by every data source
    pub http: HttpConfig,

    /// Place search and reverse lookup
    pub geocoding: GeocodingConfig,

    /// Forecast API
    pub weather: WeatherConfig,

    /// Soil composition API
    pub soil: SoilConfig,

    /// Point-of-interest query API
    pub shops: ShopsConfig,

    /// Earth observation backend for the vegetation index
    pub earth_engine: EarthEngineConfig,

    /// Map embedding
    #[serde(default)]
    pub maps: MapsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent sent upstream (Nominatim rejects anonymous clients)
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    pub api_endpoint: String,

    /// Country every place search is constrained to
    pub country: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Forecast API endpoint
    pub api_endpoint: String,

    /// Timezone the hourly series is labelled in
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SoilConfig {
    /// Soil properties query endpoint
    pub api_endpoint: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShopsConfig {
    /// Overpass interpreter endpoint
    pub api_endpoint: String,

    /// Search radius around the location in meters
    pub radius_meters: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EarthEngineConfig {
    /// Earth Engine REST base URL
    pub api_endpoint: String,

    /// Cloud project the computation is billed to
    pub project: String,

    /// Path to a service account key file; empty disables the index
    pub credentials_file: String,

    /// Token endpoint overriding the one in the key file
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MapsConfig {
    /// Google Maps Embed API key; no satellite view without it
    pub embed_api_key: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRINFO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("http.timeout_secs", 10)?
            .set_default("http.user_agent", "Agrinfo/0.1 (farm dashboard)")?
            .set_default("geocoding.api_endpoint", "https://nominatim.openstreetmap.org")?
            .set_default("geocoding.country", "India")?
            .set_default("weather.api_endpoint", "https://api.open-meteo.com/v1/forecast")?
            .set_default("weather.timezone", "Asia/Kolkata")?
            .set_default(
                "soil.api_endpoint",
                "https://rest.isric.org/soilgrids/v2.0/properties/query",
            )?
            .set_default("shops.api_endpoint", "http://overpass-api.de/api/interpreter")?
            .set_default("shops.radius_meters", 10000)?
            .set_default("earth_engine.api_endpoint", "https://earthengine.googleapis.com")?
            .set_default("earth_engine.project", "")?
            .set_default("earth_engine.credentials_file", "")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRINFO_ prefix)
            .add_source(
                Environment::with_prefix("AGRINFO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
