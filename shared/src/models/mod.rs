//! Domain models for the Agrinfo farm dashboard

mod inventory;
mod recommendation;
mod shop;
mod soil;
mod user;
mod vegetation;
mod weather;

pub use inventory::*;
pub use recommendation::*;
pub use shop::*;
pub use soil::*;
pub use user::*;
pub use vegetation::*;
pub use weather::*;
