//! Route definitions for the Agrinfo dashboard API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - dashboard
        .nest("/dashboard", dashboard_routes(state.clone()))
        // Protected routes - single source lookups
        .nest("/sources", source_routes(state.clone()))
        // Protected routes - inventory
        .nest("/inventory", inventory_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

/// Dashboard routes (protected)
fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/irrigation", get(handlers::get_irrigation))
        .route("/crop-care", get(handlers::get_crop_care))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Data source routes (protected)
fn source_routes(state: AppState) -> Router<AppState> {
    use handlers::sources;

    Router::new()
        .route("/geocode", get(sources::geocode))
        .route("/weather", get(sources::weather))
        .route("/vegetation", get(sources::vegetation))
        .route("/soil", get(sources::soil))
        .route("/shops", get(sources::shops))
        .route("/address", get(sources::address))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/crops", get(handlers::list_crops).post(handlers::add_crop))
        .route("/crops/catalog", get(handlers::get_crop_catalog))
        .route("/crops/export", get(handlers::export_crops))
        .route(
            "/pesticides",
            get(handlers::list_pesticides).post(handlers::add_pesticide),
        )
        .route("/pesticides/export", get(handlers::export_pesticides))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
