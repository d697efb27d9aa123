//! bakery-server: restaurant and bakery commerce backend
//!
//! - Menu catalogue, cart and wishlist
//! - Orders with a status state machine and audit trail
//! - Midtrans Snap hosted checkout with signed webhook reconciliation
//! - Table reservations with per-day availability
//! - Ingredient inventory

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod services;
pub mod state;
pub mod util;
pub mod validation;

pub use api::build_app;
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
