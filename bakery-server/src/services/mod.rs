//! Business services
//!
//! Each function takes the shared [`AppState`](crate::state::AppState) and,
//! where the operation is caller-scoped, the authenticated
//! [`CurrentCustomer`]. Handlers stay thin: parse, call, wrap.

pub mod cart;
pub mod customer;
pub mod inventory;
pub mod menu;
pub mod order;
pub mod payment;
pub mod reservation;
pub mod table;
pub mod wishlist;

use shared::error::AppError;
use shared::response::PageParams;

use crate::auth::CurrentCustomer;
use crate::db::Page;

pub(crate) fn page_window(params: &PageParams) -> Page {
    Page {
        limit: params.limit(),
        offset: params.offset(),
    }
}

/// Non-admins may only touch their own rows. Foreign rows read as missing.
pub(crate) fn ensure_visible(
    who: &CurrentCustomer,
    owner_id: i64,
    not_found: AppError,
) -> Result<(), AppError> {
    if who.is_admin() || who.id == owner_id {
        Ok(())
    } else {
        Err(not_found)
    }
}

/// Customer-scoped list filter: admins see everything.
pub(crate) fn scope(who: &CurrentCustomer) -> Option<i64> {
    if who.is_admin() { None } else { Some(who.id) }
}
