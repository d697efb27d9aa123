//! Ingredient stock levels (informational)

use shared::error::{AppError, ErrorCode};
use shared::models::{Ingredient, IngredientCreate, IngredientUpdate};

use crate::db::StoreError;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_non_negative, validate_required_text,
};

fn name_taken(e: StoreError) -> ServiceError {
    match e {
        StoreError::UniqueViolation(_) => AppError::new(ErrorCode::IngredientNameExists).into(),
        other => other.into(),
    }
}

pub async fn list(state: &AppState) -> ServiceResult<Vec<Ingredient>> {
    Ok(state.store.list_ingredients().await?)
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<Ingredient> {
    Ok(state
        .store
        .ingredient_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::IngredientNotFound))?)
}

pub async fn create(state: &AppState, mut req: IngredientCreate) -> ServiceResult<Ingredient> {
    req.name = req.name.trim().to_string();
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&req.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_non_negative(req.quantity, "quantity")?;
    validate_non_negative(req.reorder_level, "reorder_level")?;

    let ingredient = state
        .store
        .insert_ingredient(&req, state.clock.now_millis())
        .await
        .map_err(name_taken)?;
    if ingredient.needs_reorder() {
        tracing::info!(
            ingredient_id = ingredient.id,
            name = %ingredient.name,
            "Ingredient at or below reorder level"
        );
    }
    Ok(ingredient)
}

pub async fn update(
    state: &AppState,
    id: i64,
    mut req: IngredientUpdate,
) -> ServiceResult<Ingredient> {
    if let Some(name) = req.name.take() {
        let name = name.trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        req.name = Some(name);
    }
    if let Some(unit) = &req.unit {
        validate_required_text(unit, "unit", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(q) = req.quantity {
        validate_non_negative(q, "quantity")?;
    }
    if let Some(r) = req.reorder_level {
        validate_non_negative(r, "reorder_level")?;
    }

    let ingredient = state
        .store
        .update_ingredient(id, &req, state.clock.now_millis())
        .await
        .map_err(name_taken)?
        .ok_or_else(|| AppError::new(ErrorCode::IngredientNotFound))?;
    if ingredient.needs_reorder() {
        tracing::info!(
            ingredient_id = id,
            name = %ingredient.name,
            "Ingredient at or below reorder level"
        );
    }
    Ok(ingredient)
}

pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    if !state
        .store
        .soft_delete_ingredient(id, state.clock.now_millis())
        .await?
    {
        return Err(AppError::new(ErrorCode::IngredientNotFound).into());
    }
    Ok(())
}
