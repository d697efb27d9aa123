//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub table_number: i32,
    pub capacity: i32,
    /// Manual flag; `false` blocks new bookings
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub table_number: i32,
    pub capacity: i32,
    pub is_available: Option<bool>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub table_number: Option<i32>,
    pub capacity: Option<i32>,
    pub is_available: Option<bool>,
}
