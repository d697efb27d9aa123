//! Dining tables

use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::db::StoreError;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::validation::validate_min_i32;

fn number_taken(e: StoreError, number: Option<i32>) -> ServiceError {
    match e {
        StoreError::UniqueViolation(_) => {
            let mut err = AppError::new(ErrorCode::TableNumberExists);
            if let Some(n) = number {
                err = err.with_detail("table_number", n);
            }
            err.into()
        }
        other => other.into(),
    }
}

pub async fn list(state: &AppState) -> ServiceResult<Vec<DiningTable>> {
    Ok(state.store.list_tables().await?)
}

pub async fn get(state: &AppState, id: i64) -> ServiceResult<DiningTable> {
    Ok(state
        .store
        .table_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?)
}

pub async fn create(state: &AppState, req: DiningTableCreate) -> ServiceResult<DiningTable> {
    validate_min_i32(req.table_number, "table_number", 1)?;
    validate_min_i32(req.capacity, "capacity", 1)?;

    let table = state
        .store
        .insert_table(&req, state.clock.now_millis())
        .await
        .map_err(|e| number_taken(e, Some(req.table_number)))?;
    tracing::info!(table_id = table.id, table_number = table.table_number, "Table created");
    Ok(table)
}

pub async fn update(
    state: &AppState,
    id: i64,
    req: DiningTableUpdate,
) -> ServiceResult<DiningTable> {
    if let Some(n) = req.table_number {
        validate_min_i32(n, "table_number", 1)?;
    }
    if let Some(c) = req.capacity {
        validate_min_i32(c, "capacity", 1)?;
    }

    state
        .store
        .update_table(id, &req, state.clock.now_millis())
        .await
        .map_err(|e| number_taken(e, req.table_number))?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound).into())
}

/// Soft delete; live reservations keep their `table_number` snapshot.
pub async fn delete(state: &AppState, id: i64) -> ServiceResult<()> {
    if !state.store.soft_delete_table(id, state.clock.now_millis()).await? {
        return Err(AppError::new(ErrorCode::TableNotFound).into());
    }
    tracing::info!(table_id = id, "Table deleted");
    Ok(())
}
