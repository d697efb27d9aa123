//! Wishlist

use shared::error::{AppError, ErrorCode};
use shared::models::{WishlistAdd, WishlistEntry};

use crate::auth::CurrentCustomer;
use crate::error::ServiceResult;
use crate::state::AppState;

pub async fn list(state: &AppState, who: &CurrentCustomer) -> ServiceResult<Vec<WishlistEntry>> {
    Ok(state.store.wishlist(who.id).await?)
}

pub async fn add(
    state: &AppState,
    who: &CurrentCustomer,
    req: WishlistAdd,
) -> ServiceResult<WishlistEntry> {
    state
        .store
        .menu_by_id(req.menu_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;

    match state
        .store
        .insert_wishlist(who.id, req.menu_id, state.clock.now_millis())
        .await?
    {
        Some(entry) => Ok(entry),
        None => Err(AppError::new(ErrorCode::MenuAlreadyInWishlist)
            .with_detail("menu_id", req.menu_id)
            .into()),
    }
}

pub async fn remove(state: &AppState, who: &CurrentCustomer, menu_id: i64) -> ServiceResult<()> {
    if !state
        .store
        .remove_wishlist(who.id, menu_id, state.clock.now_millis())
        .await?
    {
        return Err(AppError::new(ErrorCode::WishlistItemNotFound).into());
    }
    Ok(())
}
