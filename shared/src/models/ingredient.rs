//! Ingredient (inventory) Model
//!
//! Informational stock levels; orders never deduct from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub reorder_level: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

impl Ingredient {
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub unit: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub reorder_level: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub reorder_level: Option<Decimal>,
}
