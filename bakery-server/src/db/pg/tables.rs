//! Dining table queries

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use sqlx::PgConnection;

use crate::db::StoreResult;

const COLUMNS: &str =
    "id, table_number, capacity, is_available, created_at, updated_at, deleted_at";

pub async fn list(conn: &mut PgConnection) -> StoreResult<Vec<DiningTable>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM tables WHERE deleted_at IS NULL ORDER BY table_number"
    ))
    .fetch_all(conn)
    .await?)
}

pub async fn by_id(conn: &mut PgConnection, id: i64) -> StoreResult<Option<DiningTable>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM tables WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

pub async fn for_update(conn: &mut PgConnection, id: i64) -> StoreResult<Option<DiningTable>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM tables WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

pub async fn insert(
    conn: &mut PgConnection,
    data: &DiningTableCreate,
    now: i64,
) -> StoreResult<DiningTable> {
    Ok(sqlx::query_as(&format!(
        r#"
        INSERT INTO tables (table_number, capacity, is_available, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.table_number)
    .bind(data.capacity)
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .fetch_one(conn)
    .await?)
}

pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    data: &DiningTableUpdate,
    now: i64,
) -> StoreResult<Option<DiningTable>> {
    Ok(sqlx::query_as(&format!(
        r#"
        UPDATE tables SET
            table_number = COALESCE($1, table_number),
            capacity = COALESCE($2, capacity),
            is_available = COALESCE($3, is_available),
            updated_at = $4
        WHERE id = $5 AND deleted_at IS NULL
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.table_number)
    .bind(data.capacity)
    .bind(data.is_available)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

/// Live reservations keep their `table_number` snapshot but lose the link.
pub async fn soft_delete(conn: &mut PgConnection, id: i64, now: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        "UPDATE tables SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE reservations SET table_id = NULL, updated_at = $1
        WHERE table_id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(true)
}
