//! Menu catalogue

use shared::error::{AppError, ErrorCode};
use shared::models::{Menu, MenuCreate, MenuQuery, MenuUpdate};
use shared::response::{PageMeta, PageParams};

use super::page_window;
use crate::db::MenuFilter;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_non_negative,
    validate_optional_text, validate_rating, validate_required_text,
};

fn validate_create(req: &MenuCreate) -> Result<(), AppError> {
    validate_required_text(&req.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&req.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&req.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.image_url, "image_url", MAX_URL_LEN)?;
    validate_non_negative(req.price, "price")?;
    if req.quantity < 0 {
        return Err(
            AppError::validation("quantity must not be negative").with_detail("field", "quantity"),
        );
    }
    validate_rating(req.rating)
}

fn validate_update(req: &MenuUpdate) -> Result<(), AppError> {
    if let Some(title) = &req.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    validate_optional_text(&req.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&req.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = req.price {
        validate_non_negative(price, "price")?;
    }
    if req.quantity.is_some_and(|q| q < 0) {
        return Err(
            AppError::validation("quantity must not be negative").with_detail("field", "quantity"),
        );
    }
    if let Some(rating) = req.rating {
        validate_rating(rating)?;
    }
    Ok(())
}

pub async fn list(state: &AppState, query: MenuQuery) -> ServiceResult<(Vec<Menu>, PageMeta)> {
    let params = PageParams {
        page: query.page,
        limit: query.limit,
    };
    let filter = MenuFilter {
        category: query.category.filter(|c| !c.trim().is_empty()),
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let (rows, total) = state.store.list_menus(&filter, page_window(&params)).await?;
    Ok((rows, params.meta(total)))
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<Menu> {
    Ok(state
        .store
        .menu_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?)
}

pub async fn create(state: &AppState, req: MenuCreate) -> ServiceResult<Menu> {
    validate_create(&req)?;
    let menu = state.store.insert_menu(&req, state.clock.now_millis()).await?;
    tracing::info!(menu_id = menu.id, title = %menu.title, "Menu created");
    Ok(menu)
}

pub async fn update(state: &AppState, id: i64, req: MenuUpdate) -> ServiceResult<Menu> {
    validate_update(&req)?;
    Ok(state
        .store
        .update_menu(id, &req, state.clock.now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?)
}

pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    if !state.store.soft_delete_menu(id, state.clock.now_millis()).await? {
        return Err(AppError::new(ErrorCode::MenuNotFound).into());
    }
    tracing::info!(menu_id = id, "Menu deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_menu_validation() {
        let mut req = MenuCreate {
            title: "Kouign-amann".into(),
            description: None,
            price: Decimal::from(35_000),
            quantity: 12,
            category: Some("pastry".into()),
            rating: 4.8,
            image_url: None,
        };
        assert!(validate_create(&req).is_ok());

        req.price = Decimal::from(-1);
        assert!(validate_create(&req).is_err());

        let bad_rating = MenuUpdate {
            rating: Some(7.0),
            ..Default::default()
        };
        assert!(validate_update(&bad_rating).is_err());
    }
}
