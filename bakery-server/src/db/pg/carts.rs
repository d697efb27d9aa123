//! Cart queries

use rust_decimal::Decimal;
use shared::models::CartLine;
use sqlx::PgConnection;

use crate::db::StoreResult;

const COLUMNS: &str = "id, customer_id, menu_id, quantity, unit_price, subtotal, \
                       created_at, updated_at, deleted_at";

pub async fn lines(conn: &mut PgConnection, customer_id: i64) -> StoreResult<Vec<CartLine>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM carts WHERE customer_id = $1 AND deleted_at IS NULL ORDER BY id"
    ))
    .bind(customer_id)
    .fetch_all(conn)
    .await?)
}

pub async fn line(
    conn: &mut PgConnection,
    customer_id: i64,
    line_id: i64,
) -> StoreResult<Option<CartLine>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM carts WHERE id = $1 AND customer_id = $2 AND deleted_at IS NULL"
    ))
    .bind(line_id)
    .bind(customer_id)
    .fetch_optional(conn)
    .await?)
}

/// Concurrent adds for the same `(customer, menu)` serialise on the partial
/// unique index.
pub async fn upsert(
    conn: &mut PgConnection,
    customer_id: i64,
    menu_id: i64,
    quantity: i32,
    unit_price: Decimal,
    now: i64,
) -> StoreResult<CartLine> {
    Ok(sqlx::query_as(&format!(
        r#"
        INSERT INTO carts (customer_id, menu_id, quantity, unit_price, subtotal,
                           created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        ON CONFLICT (customer_id, menu_id) WHERE deleted_at IS NULL
        DO UPDATE SET
            quantity = carts.quantity + EXCLUDED.quantity,
            unit_price = EXCLUDED.unit_price,
            subtotal = EXCLUDED.unit_price * (carts.quantity + EXCLUDED.quantity),
            updated_at = EXCLUDED.updated_at
        RETURNING {COLUMNS}
        "#
    ))
    .bind(customer_id)
    .bind(menu_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(unit_price * Decimal::from(quantity))
    .bind(now)
    .fetch_one(conn)
    .await?)
}

pub async fn set_quantity(
    conn: &mut PgConnection,
    customer_id: i64,
    line_id: i64,
    quantity: i32,
    unit_price: Decimal,
    now: i64,
) -> StoreResult<Option<CartLine>> {
    Ok(sqlx::query_as(&format!(
        r#"
        UPDATE carts SET quantity = $1, unit_price = $2, subtotal = $3, updated_at = $4
        WHERE id = $5 AND customer_id = $6 AND deleted_at IS NULL
        RETURNING {COLUMNS}
        "#
    ))
    .bind(quantity)
    .bind(unit_price)
    .bind(unit_price * Decimal::from(quantity))
    .bind(now)
    .bind(line_id)
    .bind(customer_id)
    .fetch_optional(conn)
    .await?)
}

pub async fn remove(
    conn: &mut PgConnection,
    customer_id: i64,
    line_id: i64,
    now: i64,
) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE carts SET deleted_at = $1, updated_at = $1
        WHERE id = $2 AND customer_id = $3 AND deleted_at IS NULL
        "#,
    )
    .bind(now)
    .bind(line_id)
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn clear(conn: &mut PgConnection, customer_id: i64, now: i64) -> StoreResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE carts SET deleted_at = $1, updated_at = $1
        WHERE customer_id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(now)
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
