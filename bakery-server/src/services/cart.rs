//! Shopping cart
//!
//! Adding a menu already in the cart merges into the existing line. Unit
//! price always comes from the current menu row.

use shared::error::{AppError, ErrorCode};
use shared::models::{CartAdd, CartLine, CartUpdate};

use crate::auth::CurrentCustomer;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::validate_min_i32;

pub async fn list(state: &AppState, who: &CurrentCustomer) -> ServiceResult<Vec<CartLine>> {
    Ok(state.store.cart_lines(who.id).await?)
}

pub async fn add(state: &AppState, who: &CurrentCustomer, req: CartAdd) -> ServiceResult<CartLine> {
    validate_min_i32(req.quantity, "quantity", 1)?;
    let menu = state
        .store
        .menu_by_id(req.menu_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;

    let line = state
        .store
        .upsert_cart_line(who.id, menu.id, req.quantity, menu.price, state.clock.now_millis())
        .await?;
    tracing::debug!(
        customer_id = who.id,
        menu_id = menu.id,
        quantity = line.quantity,
        "Cart line saved"
    );
    Ok(line)
}

pub async fn update(
    state: &AppState,
    who: &CurrentCustomer,
    line_id: i64,
    req: CartUpdate,
) -> ServiceResult<CartLine> {
    validate_min_i32(req.quantity, "quantity", 1)?;
    let line = state
        .store
        .cart_line(who.id, line_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound))?;
    let menu = state
        .store
        .menu_by_id(line.menu_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;

    Ok(state
        .store
        .set_cart_quantity(who.id, line_id, req.quantity, menu.price, state.clock.now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound))?)
}

pub async fn remove(state: &AppState, who: &CurrentCustomer, line_id: i64) -> ServiceResult<()> {
    if !state
        .store
        .remove_cart_line(who.id, line_id, state.clock.now_millis())
        .await?
    {
        return Err(AppError::new(ErrorCode::CartItemNotFound).into());
    }
    Ok(())
}

pub async fn clear(state: &AppState, who: &CurrentCustomer) -> ServiceResult<u64> {
    Ok(state.store.clear_cart(who.id, state.clock.now_millis()).await?)
}
