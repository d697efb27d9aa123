//! Data models
//!
//! Shared between bakery-server and its HTTP clients.
//! Plain row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! rows with status enums are decoded in the server's Postgres layer.
//! All IDs are `i64` (BIGSERIAL), timestamps are Unix millis.

pub mod cart;
pub mod customer;
pub mod dining_table;
pub mod ingredient;
pub mod menu;
pub mod order;
pub mod payment;
pub mod reservation;
pub mod wishlist;

// Re-exports
pub use cart::*;
pub use customer::*;
pub use dining_table::*;
pub use ingredient::*;
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use reservation::*;
pub use wishlist::*;
