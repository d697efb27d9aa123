//! Order lifecycle
//!
//! Creation prices every line from the menu row read inside the same
//! transaction. Status changes lock the order row, check the transition
//! table and append an audit record before commit.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CustomerSummary, NewOrder, NewOrderItem, Order, OrderCreate, OrderDetail, OrderStatus,
    OrderTransition, PaymentStatus, TransitionSource,
};
use shared::response::{PageMeta, PageParams};
use std::collections::HashMap;

use super::{ensure_visible, page_window, scope};
use crate::auth::CurrentCustomer;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{MAX_ADDRESS_LEN, validate_min_i32, validate_required_text};

fn validate_create(req: &OrderCreate) -> Result<(), AppError> {
    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).with_detail("field", "items"));
    }
    for line in &req.items {
        validate_min_i32(line.quantity, "quantity", 1)?;
    }
    validate_required_text(&req.delivery_address, "delivery_address", MAX_ADDRESS_LEN)
}

pub async fn create(
    state: &AppState,
    who: &CurrentCustomer,
    req: OrderCreate,
) -> ServiceResult<Order> {
    validate_create(&req)?;
    let now = state.clock.now_millis();

    let mut ids: Vec<i64> = req.items.iter().map(|l| l.menu_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut tx = state.store.begin().await?;
    let menus: HashMap<i64, Decimal> = tx
        .live_menus(&ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.price))
        .collect();

    let mut items = Vec::with_capacity(req.items.len());
    for line in &req.items {
        let Some(&price) = menus.get(&line.menu_id) else {
            return Err(AppError::new(ErrorCode::MenuNotFound)
                .with_detail("menu_id", line.menu_id)
                .into());
        };
        if let Some(quoted) = line.price
            && quoted != price
        {
            tracing::warn!(
                menu_id = line.menu_id,
                quoted = %quoted,
                price = %price,
                "Client price differs from menu price, using menu price"
            );
        }
        items.push(NewOrderItem {
            menu_id: line.menu_id,
            quantity: line.quantity,
            price_at_order: price,
        });
    }

    let total_price: Decimal = items
        .iter()
        .map(|i| i.price_at_order * Decimal::from(i.quantity))
        .sum();

    let data = NewOrder {
        customer_id: who.id,
        total_price,
        delivery_address: req.delivery_address.trim().to_string(),
        items,
    };
    let order = tx.insert_order(&data, now).await?;
    tx.record_transition(order.id, None, OrderStatus::Pending, TransitionSource::Customer, now)
        .await?;
    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        customer_id = who.id,
        total_price = %order.total_price,
        "Order created"
    );
    Ok(order)
}

pub async fn get(state: &AppState, who: &CurrentCustomer, id: i64) -> ServiceResult<OrderDetail> {
    let order = state
        .store
        .order_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    ensure_visible(who, order.customer_id, AppError::new(ErrorCode::OrderNotFound))?;

    let customer = state
        .store
        .customer_by_id(order.customer_id)
        .await?
        .map(|c| CustomerSummary::from(&c));
    Ok(OrderDetail { order, customer })
}

pub async fn list(
    state: &AppState,
    who: &CurrentCustomer,
    params: PageParams,
) -> ServiceResult<(Vec<Order>, PageMeta)> {
    let (orders, total) = state
        .store
        .list_orders(scope(who), page_window(&params))
        .await?;
    Ok((orders, params.meta(total)))
}

pub async fn transitions(
    state: &AppState,
    who: &CurrentCustomer,
    id: i64,
) -> ServiceResult<Vec<OrderTransition>> {
    let order = state
        .store
        .order_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    ensure_visible(who, order.customer_id, AppError::new(ErrorCode::OrderNotFound))?;
    Ok(state.store.order_transitions(id).await?)
}

/// Admin status change. Setting the current status is a successful no-op.
pub async fn update_status(
    state: &AppState,
    id: i64,
    target: OrderStatus,
) -> ServiceResult<Order> {
    let now = state.clock.now_millis();
    let mut tx = state.store.begin().await?;
    let mut order = tx
        .order_for_update(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if order.status == target {
        return Ok(order);
    }
    if !order.status.can_transition_to(target) {
        tracing::warn!(
            order_id = id,
            from = %order.status,
            to = %target,
            "Rejected order transition"
        );
        return Err(AppError::with_message(
            ErrorCode::InvalidTransition,
            format!("Cannot move order from {} to {}", order.status, target),
        )
        .with_detail("from", order.status.as_db())
        .with_detail("to", target.as_db())
        .into());
    }

    let from = order.status;
    tx.set_order_status(id, target, now).await?;
    tx.record_transition(id, Some(from), target, TransitionSource::Admin, now)
        .await?;
    tx.commit().await?;

    tracing::info!(order_id = id, from = %from, to = %target, "Order status updated");
    order.status = target;
    order.updated_at = now;
    Ok(order)
}

/// Admin soft delete; refused while the payment is settled.
pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    let now = state.clock.now_millis();
    let mut tx = state.store.begin().await?;
    tx.order_for_update(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if let Some(payment) = tx.payment_for_update(id).await?
        && payment.status == PaymentStatus::Success
    {
        return Err(AppError::new(ErrorCode::OrderHasSettledPayment).into());
    }

    tx.soft_delete_order(id, now).await?;
    tx.commit().await?;
    tracing::info!(order_id = id, "Order deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderLineInput;

    fn line(menu_id: i64, quantity: i32) -> OrderLineInput {
        OrderLineInput {
            menu_id,
            quantity,
            price: None,
        }
    }

    #[test]
    fn test_validate_create() {
        let empty = OrderCreate {
            items: vec![],
            delivery_address: "A".into(),
        };
        assert_eq!(validate_create(&empty).unwrap_err().code, ErrorCode::OrderEmpty);

        let zero_qty = OrderCreate {
            items: vec![line(1, 0)],
            delivery_address: "A".into(),
        };
        assert_eq!(
            validate_create(&zero_qty).unwrap_err().code,
            ErrorCode::ValidationFailed
        );

        let blank_address = OrderCreate {
            items: vec![line(1, 1)],
            delivery_address: "  ".into(),
        };
        assert!(validate_create(&blank_address).is_err());

        let ok = OrderCreate {
            items: vec![line(1, 2), line(2, 1)],
            delivery_address: "A".into(),
        };
        assert!(validate_create(&ok).is_ok());
    }
}
