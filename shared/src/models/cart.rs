//! Cart Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a customer's cart. `(customer_id, menu_id)` is unique among live rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartLine {
    pub id: i64,
    pub customer_id: i64,
    pub menu_id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// `unit_price * quantity`
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAdd {
    pub menu_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdate {
    pub quantity: i32,
}
