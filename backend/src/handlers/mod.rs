//! HTTP request handlers

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod sources;

pub use auth::{login, register};
pub use dashboard::{get_crop_care, get_dashboard, get_irrigation};
pub use health::health_check;
pub use inventory::{
    add_crop, add_pesticide, export_crops, export_pesticides, get_crop_catalog, list_crops,
    list_pesticides,
};
