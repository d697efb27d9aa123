//! Hosted-checkout payments
//!
//! Intent creation calls the gateway outside any transaction and persists
//! the payment row only after a 201. Webhook ingestion verifies the SHA-512
//! signature before touching storage, then reconciles payment and order
//! under row locks. Replays of the same notification write nothing.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    NewPayment, Order, OrderStatus, Payment, PaymentConfig, PaymentIntent, PaymentStatus,
    TransitionSource,
};

use crate::auth::CurrentCustomer;
use crate::error::ServiceResult;
use crate::gateway::{
    CustomerDetails, ItemDetail, Notification, SnapRequest, TransactionDetails,
};
use crate::state::AppState;

/// Whole currency units, as the provider expects
fn whole_units(amount: Decimal, field: &'static str) -> Result<i64, AppError> {
    if !amount.fract().is_zero() {
        return Err(AppError::invalid_request("Amount is not in whole currency units")
            .with_detail("field", field)
            .with_detail("amount", amount.to_string()));
    }
    amount
        .to_i64()
        .ok_or_else(|| AppError::new(ErrorCode::ValueOutOfRange).with_detail("field", field))
}

/// A row created by a notification before any intent has no redirect yet
fn has_checkout(payment: &Payment) -> bool {
    !payment.payment_url.is_empty()
}

fn intent_of(payment: Payment) -> PaymentIntent {
    PaymentIntent {
        order_id: payment.order_id,
        token: payment.payment_token,
        redirect_url: payment.payment_url,
    }
}

/// Build the Snap transaction. Item amounts must add up to `gross_amount`.
fn snap_request(
    order: &Order,
    names: Vec<String>,
    customer_details: Option<CustomerDetails>,
) -> Result<SnapRequest, AppError> {
    let gross_amount = whole_units(order.total_price, "total_price")?;

    let mut item_details = Vec::with_capacity(order.items.len());
    let mut items_sum: i64 = 0;
    for (item, name) in order.items.iter().zip(names) {
        let price = whole_units(item.price_at_order, "price_at_order")?;
        items_sum = price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line| items_sum.checked_add(line))
            .ok_or_else(|| {
                AppError::new(ErrorCode::ValueOutOfRange).with_detail("field", "items")
            })?;
        item_details.push(ItemDetail {
            id: item.menu_id.to_string(),
            price,
            quantity: item.quantity,
            name,
        });
    }
    if items_sum != gross_amount {
        tracing::error!(
            order_id = order.id,
            items_sum,
            gross_amount,
            "Order items do not add up to the order total"
        );
        return Err(AppError::invalid_request("Order items do not add up to the order total")
            .with_detail("gross_amount", gross_amount)
            .with_detail("items_sum", items_sum));
    }

    Ok(SnapRequest {
        transaction_details: TransactionDetails {
            order_id: order.id.to_string(),
            gross_amount,
        },
        item_details,
        customer_details,
    })
}

pub async fn create_intent(
    state: &AppState,
    who: &CurrentCustomer,
    order_id: i64,
) -> ServiceResult<PaymentIntent> {
    let order = state
        .store
        .order_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if order.customer_id != who.id && !who.is_admin() {
        return Err(AppError::forbidden("Order belongs to another customer").into());
    }

    if let Some(existing) = state.store.payment_by_order(order_id).await?
        && has_checkout(&existing)
    {
        return Ok(intent_of(existing));
    }
    if order.status != OrderStatus::Pending {
        return Err(AppError::new(ErrorCode::OrderNotPending)
            .with_detail("status", order.status.as_db())
            .into());
    }

    let mut names = Vec::with_capacity(order.items.len());
    for item in &order.items {
        names.push(match state.store.menu_by_id(item.menu_id).await? {
            Some(menu) => menu.title,
            None => format!("Menu #{}", item.menu_id),
        });
    }
    let customer_details = state
        .store
        .customer_by_id(order.customer_id)
        .await?
        .map(|c| CustomerDetails {
            first_name: c.name,
            email: c.email,
        });

    let request = snap_request(&order, names, customer_details)?;
    let snap = state.gateway.create_transaction(&request).await?;

    let now = state.clock.now_millis();
    let mut tx = state.store.begin().await?;
    let locked = tx
        .order_for_update(order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let existing = tx.payment_for_update(order_id).await?;
    if let Some(existing) = &existing
        && has_checkout(existing)
    {
        // a concurrent request won the race
        return Ok(intent_of(existing.clone()));
    }
    if locked.status != OrderStatus::Pending {
        return Err(AppError::new(ErrorCode::OrderNotPending).into());
    }

    let payment = match existing {
        Some(placeholder) => {
            if placeholder.status != PaymentStatus::Pending {
                return Err(AppError::new(ErrorCode::OrderNotPending)
                    .with_detail("payment_status", placeholder.status.as_db())
                    .into());
            }
            tx.set_payment_checkout(order_id, &snap.token, &snap.redirect_url, now)
                .await?;
            tracing::info!(order_id, payment_id = placeholder.id, "Checkout attached to payment");
            Payment {
                payment_token: snap.token,
                payment_url: snap.redirect_url,
                updated_at: now,
                ..placeholder
            }
        }
        None => {
            let data = NewPayment {
                order_id,
                amount: locked.total_price,
                payment_token: snap.token,
                payment_url: snap.redirect_url,
            };
            let Some(payment) = tx.insert_payment(&data, now).await? else {
                let existing = tx
                    .payment_for_update(order_id)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
                return Ok(intent_of(existing));
            };
            tracing::info!(order_id, payment_id = payment.id, "Payment intent created");
            payment
        }
    };
    tx.commit().await?;

    Ok(intent_of(payment))
}

pub fn client_config(state: &AppState) -> PaymentConfig {
    PaymentConfig {
        client_key: state.config.midtrans.client_key.clone(),
        merchant_id: state.config.midtrans.merchant_id.clone(),
    }
}

/// Target `(payment, order)` statuses for a provider `transaction_status`.
///
/// `capture` consults `fraud_status`: `accept` (or absent) settles, `deny`
/// fails, `challenge` stays pending until a follow-up notification.
pub fn map_transaction_status(
    transaction_status: &str,
    fraud_status: Option<&str>,
) -> Option<(PaymentStatus, OrderStatus)> {
    use OrderStatus as O;
    use PaymentStatus as P;
    match (transaction_status, fraud_status) {
        ("capture", None | Some("accept")) => Some((P::Success, O::Paid)),
        ("capture", Some("deny")) => Some((P::Failed, O::Cancelled)),
        ("capture", Some("challenge")) => Some((P::Pending, O::Pending)),
        ("capture", Some(_)) => None,
        ("settlement", _) => Some((P::Success, O::Paid)),
        ("pending", _) => Some((P::Pending, O::Pending)),
        ("deny", _) => Some((P::Failed, O::Cancelled)),
        ("expire", _) => Some((P::Expired, O::Cancelled)),
        ("cancel", _) => Some((P::Cancelled, O::Cancelled)),
        _ => None,
    }
}

/// Result of applying one notification
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookOutcome {
    pub order_id: i64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    /// `false` when the notification was a replay and nothing was written
    pub changed: bool,
}

pub async fn handle_notification(state: &AppState, body: &[u8]) -> ServiceResult<WebhookOutcome> {
    let n: Notification = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Malformed payment notification");
        AppError::invalid_request("Malformed notification body")
    })?;

    if !state.gateway.verify_notification(&n) {
        tracing::warn!(order_id = %n.order_id, "Payment notification signature mismatch");
        return Err(AppError::new(ErrorCode::InvalidSignature).into());
    }

    let order_id: i64 = n.order_id.parse().map_err(|_| {
        AppError::invalid_request("Unknown order_id").with_detail("order_id", n.order_id.clone())
    })?;
    let (target_payment, target_order) =
        map_transaction_status(&n.transaction_status, n.fraud_status.as_deref()).ok_or_else(
            || {
                tracing::warn!(
                    order_id,
                    transaction_status = %n.transaction_status,
                    fraud_status = ?n.fraud_status,
                    "Unknown transaction status"
                );
                AppError::new(ErrorCode::UnknownTransactionStatus)
                    .with_detail("transaction_status", n.transaction_status.clone())
            },
        )?;

    let now = state.clock.now_millis();
    let mut tx = state.store.begin().await?;
    let order = tx
        .order_for_update(order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let mut changed = false;
    let mut stale = false;
    let payment_status = match tx.payment_for_update(order_id).await? {
        None => {
            // settlement reported before an intent was recorded locally
            let data = NewPayment {
                order_id,
                amount: order.total_price,
                payment_token: String::new(),
                payment_url: String::new(),
            };
            tx.insert_payment(&data, now).await?;
            if target_payment != PaymentStatus::Pending {
                tx.set_payment_status(order_id, target_payment, now).await?;
            }
            changed = true;
            target_payment
        }
        Some(p) if p.status == target_payment => p.status,
        Some(p) if p.status.is_terminal() && target_payment == PaymentStatus::Pending => {
            tracing::warn!(
                order_id,
                current = %p.status,
                "Ignoring pending notification for a settled payment"
            );
            stale = true;
            p.status
        }
        Some(p) => {
            if p.status.is_terminal() {
                tracing::warn!(
                    order_id,
                    from = %p.status,
                    to = %target_payment,
                    "Provider reported a new outcome for a settled payment"
                );
            }
            tx.set_payment_status(order_id, target_payment, now).await?;
            changed = true;
            target_payment
        }
    };

    let mut order_status = order.status;
    if !stale && order.status != target_order {
        if order.status.can_transition_to(target_order) {
            tx.set_order_status(order_id, target_order, now).await?;
            tx.record_transition(
                order_id,
                Some(order.status),
                target_order,
                TransitionSource::Webhook,
                now,
            )
            .await?;
            order_status = target_order;
            changed = true;
        } else {
            tracing::warn!(
                order_id,
                from = %order.status,
                to = %target_order,
                "Order transition from notification not permitted, order left unchanged"
            );
        }
    }
    tx.commit().await?;

    tracing::info!(
        order_id,
        transaction_status = %n.transaction_status,
        payment_status = %payment_status,
        order_status = %order_status,
        changed,
        "Payment notification applied"
    );
    Ok(WebhookOutcome {
        order_id,
        payment_status,
        order_status,
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        use OrderStatus as O;
        use PaymentStatus as P;
        let cases = [
            ("capture", Some("accept"), Some((P::Success, O::Paid))),
            ("capture", None, Some((P::Success, O::Paid))),
            ("capture", Some("deny"), Some((P::Failed, O::Cancelled))),
            ("capture", Some("challenge"), Some((P::Pending, O::Pending))),
            ("settlement", None, Some((P::Success, O::Paid))),
            ("pending", None, Some((P::Pending, O::Pending))),
            ("deny", None, Some((P::Failed, O::Cancelled))),
            ("expire", None, Some((P::Expired, O::Cancelled))),
            ("cancel", None, Some((P::Cancelled, O::Cancelled))),
            ("refund", None, None),
            ("capture", Some("weird"), None),
        ];
        for (status, fraud, expected) in cases {
            assert_eq!(map_transaction_status(status, fraud), expected, "{status}/{fraud:?}");
        }
    }

    #[test]
    fn test_whole_units_rejects_fractions() {
        assert_eq!(whole_units(Decimal::new(10_000_000, 2), "total_price").unwrap(), 100_000);
        assert_eq!(whole_units(Decimal::from(100_000), "total_price").unwrap(), 100_000);
        assert_eq!(
            whole_units(Decimal::new(450, 2), "total_price").unwrap_err().code,
            ErrorCode::InvalidRequest
        );
        assert_eq!(
            whole_units(Decimal::MAX, "total_price").unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }
}
