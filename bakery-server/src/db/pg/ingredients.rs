//! Ingredient stock queries

use shared::models::{Ingredient, IngredientCreate, IngredientUpdate};
use sqlx::PgConnection;

use crate::db::StoreResult;

const COLUMNS: &str =
    "id, name, quantity, unit, reorder_level, created_at, updated_at, deleted_at";

pub async fn list(conn: &mut PgConnection) -> StoreResult<Vec<Ingredient>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM ingredients WHERE deleted_at IS NULL ORDER BY name"
    ))
    .fetch_all(conn)
    .await?)
}

pub async fn by_id(conn: &mut PgConnection, id: i64) -> StoreResult<Option<Ingredient>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM ingredients WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

pub async fn insert(
    conn: &mut PgConnection,
    data: &IngredientCreate,
    now: i64,
) -> StoreResult<Ingredient> {
    Ok(sqlx::query_as(&format!(
        r#"
        INSERT INTO ingredients (name, quantity, unit, reorder_level, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(data.quantity)
    .bind(&data.unit)
    .bind(data.reorder_level)
    .bind(now)
    .fetch_one(conn)
    .await?)
}

pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    data: &IngredientUpdate,
    now: i64,
) -> StoreResult<Option<Ingredient>> {
    Ok(sqlx::query_as(&format!(
        r#"
        UPDATE ingredients SET
            name = COALESCE($1, name),
            quantity = COALESCE($2, quantity),
            unit = COALESCE($3, unit),
            reorder_level = COALESCE($4, reorder_level),
            updated_at = $5
        WHERE id = $6 AND deleted_at IS NULL
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(data.quantity)
    .bind(&data.unit)
    .bind(data.reorder_level)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

pub async fn soft_delete(conn: &mut PgConnection, id: i64, now: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE ingredients SET deleted_at = $1, updated_at = $1
        WHERE id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
