//! Shared fixtures: in-memory store, frozen clock and a fake checkout provider.

#![allow(dead_code)]

use async_trait::async_trait;
use bakery_server::auth::CurrentCustomer;
use bakery_server::clock::FixedClock;
use bakery_server::config::Config;
use bakery_server::db::{MemoryStore, Store};
use bakery_server::gateway::signature::{signature_for, verify_signature};
use bakery_server::gateway::{GatewayError, Notification, PaymentGateway, SnapRequest, SnapToken};
use bakery_server::services::{customer, menu, table};
use bakery_server::AppState;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use shared::models::{
    DiningTable, DiningTableCreate, Menu, MenuCreate, NewCustomer, RegisterRequest, Role,
};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const SERVER_KEY: &str = "SB-Mid-server-test-key";
pub const JWT_SECRET: &str = "integration-test-jwt-secret";

/// 2030-05-01T09:00:00Z
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 5, 1, 9, 0, 0).unwrap()
}

// ========================================================================
// Fake checkout provider
// ========================================================================

/// Issues `snap-token-<n>` tokens and checks signatures with the real digest.
pub struct FakeGateway {
    server_key: String,
    calls: AtomicUsize,
    fail: AtomicBool,
    last_request: Mutex<Option<SnapRequest>>,
}

impl FakeGateway {
    pub fn new(server_key: &str) -> Self {
        Self {
            server_key: server_key.to_string(),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make subsequent calls answer with a non-201 status
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn last_request(&self) -> Option<SnapRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapToken, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_request.lock().unwrap() = Some(request.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::UnexpectedStatus {
                status: 500,
                body: "internal".into(),
            });
        }
        Ok(SnapToken {
            token: format!("snap-token-{n}"),
            redirect_url: format!(
                "https://app.sandbox.midtrans.com/snap/v2/vtweb/snap-token-{n}"
            ),
        })
    }

    fn verify_notification(&self, n: &Notification) -> bool {
        verify_signature(
            &n.order_id,
            &n.status_code,
            &n.gross_amount,
            &self.server_key,
            &n.signature_key,
        )
    }
}

// ========================================================================
// Harness
// ========================================================================

pub struct Harness {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub gateway: Arc<FakeGateway>,
}

pub fn test_config() -> Config {
    Config::from_lookup(|name| match name {
        "JWT_SECRET" => Some(JWT_SECRET.to_string()),
        "MIDTRANS_SERVER_KEY" => Some(SERVER_KEY.to_string()),
        "MIDTRANS_CLIENT_KEY" => Some("SB-Mid-client-test-key".to_string()),
        "MIDTRANS_MERCHANT_ID" => Some("G000000000".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(t0()));
    let gateway = Arc::new(FakeGateway::new(SERVER_KEY));
    let state = AppState::from_parts(test_config(), store.clone(), gateway.clone(), clock.clone());
    Harness {
        state,
        store,
        clock,
        gateway,
    }
}

// ========================================================================
// Seed helpers
// ========================================================================

pub async fn register(state: &AppState, email: &str) -> CurrentCustomer {
    let c = customer::register(
        state,
        RegisterRequest {
            email: email.to_string(),
            password: "correct-horse-9".to_string(),
            name: "Test Customer".to_string(),
            address: Some("Jl. Braga 1".to_string()),
        },
    )
    .await
    .unwrap();
    CurrentCustomer {
        id: c.id,
        email: c.email,
        name: c.name,
        role: c.role,
    }
}

pub async fn admin(h: &Harness) -> CurrentCustomer {
    let c = h
        .store
        .insert_customer(
            &NewCustomer {
                email: "admin@bakery.test".to_string(),
                password_hash: bakery_server::util::hash_password("admin-password-1").unwrap(),
                name: "Admin".to_string(),
                address: None,
                role: Role::Admin,
            },
            t0().timestamp_millis(),
        )
        .await
        .unwrap();
    CurrentCustomer {
        id: c.id,
        email: c.email,
        name: c.name,
        role: c.role,
    }
}

pub async fn menu_item(state: &AppState, title: &str, price: i64) -> Menu {
    menu::create(
        state,
        MenuCreate {
            title: title.to_string(),
            description: Some(format!("Fresh {title}")),
            price: Decimal::from(price),
            quantity: 20,
            category: Some("bread".to_string()),
            rating: 4.5,
            image_url: None,
        },
    )
    .await
    .unwrap()
}

pub async fn dining_table(state: &AppState, number: i32, capacity: i32) -> DiningTable {
    table::create(
        state,
        DiningTableCreate {
            table_number: number,
            capacity,
            is_available: Some(true),
        },
    )
    .await
    .unwrap()
}

/// Notification body signed with [`SERVER_KEY`]
pub fn signed_notification(
    order_id: i64,
    status_code: &str,
    gross_amount: &str,
    transaction_status: &str,
    fraud_status: Option<&str>,
) -> Vec<u8> {
    let order_id = order_id.to_string();
    let signature = signature_for(&order_id, status_code, gross_amount, SERVER_KEY);
    let mut body = serde_json::json!({
        "order_id": order_id,
        "status_code": status_code,
        "gross_amount": gross_amount,
        "signature_key": signature,
        "transaction_status": transaction_status,
        "payment_type": "bank_transfer",
    });
    if let Some(fraud) = fraud_status {
        body["fraud_status"] = serde_json::Value::from(fraud);
    }
    serde_json::to_vec(&body).unwrap()
}
