//! Wishlist queries

use shared::models::WishlistEntry;
use sqlx::PgConnection;

use crate::db::StoreResult;

const COLUMNS: &str = "id, customer_id, menu_id, created_at, updated_at, deleted_at";

pub async fn list(conn: &mut PgConnection, customer_id: i64) -> StoreResult<Vec<WishlistEntry>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM wishlists WHERE customer_id = $1 AND deleted_at IS NULL ORDER BY id"
    ))
    .bind(customer_id)
    .fetch_all(conn)
    .await?)
}

pub async fn insert(
    conn: &mut PgConnection,
    customer_id: i64,
    menu_id: i64,
    now: i64,
) -> StoreResult<Option<WishlistEntry>> {
    Ok(sqlx::query_as(&format!(
        r#"
        INSERT INTO wishlists (customer_id, menu_id, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        ON CONFLICT (customer_id, menu_id) WHERE deleted_at IS NULL DO NOTHING
        RETURNING {COLUMNS}
        "#
    ))
    .bind(customer_id)
    .bind(menu_id)
    .bind(now)
    .fetch_optional(conn)
    .await?)
}

pub async fn remove(
    conn: &mut PgConnection,
    customer_id: i64,
    menu_id: i64,
    now: i64,
) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE wishlists SET deleted_at = $1, updated_at = $1
        WHERE customer_id = $2 AND menu_id = $3 AND deleted_at IS NULL
        "#,
    )
    .bind(now)
    .bind(customer_id)
    .bind(menu_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
