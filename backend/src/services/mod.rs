//! Business logic services for the Agrinfo dashboard

pub mod auth;
pub mod dashboard;
pub mod inventory;

pub use auth::{AccountService, TokenIssuer};
pub use dashboard::{DashboardService, DataSources, Section};
pub use inventory::InventoryService;
