//! Payment Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment status, one row per order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
    Expired,
    Cancelled,
}

impl PaymentStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            "expired" => Some(Self::Expired),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    /// Anything but `pending` is a settled outcome
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    /// Equals the order total at creation
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub payment_token: String,
    pub payment_url: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Insert payload handed to the store
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: i64,
    pub amount: Decimal,
    pub payment_token: String,
    pub payment_url: String,
}

/// Hosted-checkout session returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentIntent {
    pub order_id: i64,
    pub token: String,
    pub redirect_url: String,
}

/// Public keys a checkout front-end needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub client_key: String,
    pub merchant_id: String,
}
