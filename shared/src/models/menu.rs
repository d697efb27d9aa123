//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item (bread, cake, drink ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Menu {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Unit price in currency units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Stock on hand (informational)
    pub quantity: i32,
    pub category: Option<String>,
    pub rating: f64,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Create menu payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCreate {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: i32,
    pub category: Option<String>,
    #[serde(default)]
    pub rating: f64,
    pub image_url: Option<String>,
}

/// Update menu payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

/// Menu list filters (`?page=&limit=&category=&search=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub search: Option<String>,
}
