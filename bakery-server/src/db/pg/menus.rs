//! Menu queries

use shared::models::{Menu, MenuCreate, MenuUpdate};
use sqlx::PgConnection;

use crate::db::{MenuFilter, Page, StoreResult};

const COLUMNS: &str = "id, title, description, price, quantity, category, rating, image_url, \
                       created_at, updated_at, deleted_at";

/// `%term%` for ILIKE with the pattern metacharacters escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

const FILTER: &str = r#"
    deleted_at IS NULL
    AND ($1::text IS NULL OR category = $1)
    AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2)
"#;

pub async fn list(
    conn: &mut PgConnection,
    filter: &MenuFilter,
    page: Page,
) -> StoreResult<(Vec<Menu>, u64)> {
    let pattern = filter.search.as_deref().map(like_pattern);

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM menus WHERE {FILTER}"))
        .bind(&filter.category)
        .bind(&pattern)
        .fetch_one(&mut *conn)
        .await?;

    let rows: Vec<Menu> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM menus WHERE {FILTER} ORDER BY id LIMIT $3 OFFSET $4"
    ))
    .bind(&filter.category)
    .bind(&pattern)
    .bind(i64::from(page.limit))
    .bind(page.offset as i64)
    .fetch_all(&mut *conn)
    .await?;

    Ok((rows, total as u64))
}

pub async fn by_id(conn: &mut PgConnection, id: i64) -> StoreResult<Option<Menu>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM menus WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

/// Share-locks the rows so a concurrent soft delete waits for the order to commit
pub async fn live_for_share(conn: &mut PgConnection, ids: &[i64]) -> StoreResult<Vec<Menu>> {
    Ok(sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM menus WHERE id = ANY($1) AND deleted_at IS NULL FOR SHARE"
    ))
    .bind(ids)
    .fetch_all(conn)
    .await?)
}

pub async fn insert(conn: &mut PgConnection, data: &MenuCreate, now: i64) -> StoreResult<Menu> {
    Ok(sqlx::query_as(&format!(
        r#"
        INSERT INTO menus (title, description, price, quantity, category, rating, image_url,
                           created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.quantity)
    .bind(&data.category)
    .bind(data.rating)
    .bind(&data.image_url)
    .bind(now)
    .fetch_one(conn)
    .await?)
}

pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    data: &MenuUpdate,
    now: i64,
) -> StoreResult<Option<Menu>> {
    Ok(sqlx::query_as(&format!(
        r#"
        UPDATE menus SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            quantity = COALESCE($4, quantity),
            category = COALESCE($5, category),
            rating = COALESCE($6, rating),
            image_url = COALESCE($7, image_url),
            updated_at = $8
        WHERE id = $9 AND deleted_at IS NULL
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.quantity)
    .bind(&data.category)
    .bind(data.rating)
    .bind(&data.image_url)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?)
}

pub async fn soft_delete(conn: &mut PgConnection, id: i64, now: i64) -> StoreResult<bool> {
    let result = sqlx::query(
        "UPDATE menus SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
