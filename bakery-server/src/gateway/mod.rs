//! Hosted-checkout payment gateway port
//!
//! [`PaymentGateway`] creates checkout sessions and authenticates the
//! provider's asynchronous notifications. [`MidtransGateway`] talks to the
//! Midtrans Snap REST API.

mod midtrans;
pub mod signature;

pub use midtrans::MidtransGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("gateway request timed out")]
    Timeout,
    #[error("gateway returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Http(e)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionDetails {
    pub order_id: String,
    /// Whole currency units
    pub gross_amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDetail {
    pub id: String,
    pub price: i64,
    pub quantity: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub email: String,
}

/// Body of `POST /snap/v1/transactions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapRequest {
    pub transaction_details: TransactionDetails,
    pub item_details: Vec<ItemDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_details: Option<CustomerDetails>,
}

/// Checkout session issued by the provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapToken {
    pub token: String,
    pub redirect_url: String,
}

/// Webhook body; fields beyond these are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session; only an HTTP 201 from the provider succeeds
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapToken, GatewayError>;

    /// `true` when `signature_key` matches the locally computed digest
    fn verify_notification(&self, notification: &Notification) -> bool;
}
