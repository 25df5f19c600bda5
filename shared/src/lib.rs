//! Shared types and models for the Agrinfo farm dashboard
//!
//! This crate contains the domain types and the rule-based agronomy shared
//! between the backend, the browser front end (via WASM), and the tests.
//! Nothing in here performs I/O.

pub mod models;
pub mod session;
pub mod types;
pub mod validation;

pub use models::*;
pub use session::*;
pub use types::*;
pub use validation::*;
