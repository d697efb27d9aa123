//! Order Model

use super::customer::CustomerSummary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// ```text
/// pending ──► paid ──► preparing ──► delivered
///    │          │          │
///    └──────────┴──────────┴──► cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Preparing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Pending,
        Self::Paid,
        Self::Preparing,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "preparing" => Some(Self::Preparing),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Preparing => "preparing",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether `self -> next` is a permitted move. Staying put is not a transition.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Pending, Cancelled)
                | (Paid, Preparing)
                | (Paid, Cancelled)
                | (Preparing, Delivered)
                | (Preparing, Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

/// Who caused an order status change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionSource {
    Customer,
    Admin,
    Webhook,
}

impl TransitionSource {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "admin" => Some(Self::Admin),
            "webhook" => Some(Self::Webhook),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
            Self::Webhook => "webhook",
        }
    }
}

/// Order line with its price frozen at creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_at_order: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price_at_order * Decimal::from(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub status: OrderStatus,
    /// Always `Σ item.price_at_order × item.quantity`
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub delivery_address: String,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Order read with the owning customer attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<CustomerSummary>,
}

/// One requested order line. `price` is accepted but the menu price wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub menu_id: i64,
    pub quantity: i32,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderLineInput>,
    pub delivery_address: String,
}

/// Admin status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Insert payload handed to the store
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub total_price: Decimal,
    pub delivery_address: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_id: i64,
    pub quantity: i32,
    pub price_at_order: Decimal,
}

/// Audit row appended on every order status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTransition {
    pub id: i64,
    pub order_id: i64,
    pub from_status: Option<OrderStatus>,
    pub to_status: OrderStatus,
    pub source: TransitionSource,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Pending, Paid),
            (Pending, Cancelled),
            (Paid, Preparing),
            (Paid, Cancelled),
            (Preparing, Delivered),
            (Preparing, Cancelled),
        ];
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for to in OrderStatus::ALL {
            assert!(!Delivered.can_transition_to(to));
            assert!(!Cancelled.can_transition_to(to));
        }
        assert!(Delivered.is_terminal());
        assert!(!Preparing.is_terminal());
    }

    #[test]
    fn test_status_db_round_trip() {
        for s in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_db(s.as_db()), Some(s));
        }
        assert_eq!(OrderStatus::from_db("PAID"), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Preparing).unwrap(), "\"preparing\"");
    }

    #[test]
    fn test_line_input_price_is_optional() {
        let line: OrderLineInput =
            serde_json::from_str(r#"{"menu_id":10,"quantity":2}"#).unwrap();
        assert!(line.price.is_none());

        let line: OrderLineInput =
            serde_json::from_str(r#"{"menu_id":10,"quantity":2,"price":50000}"#).unwrap();
        assert_eq!(line.price, Some(Decimal::from(50_000)));
    }
}
