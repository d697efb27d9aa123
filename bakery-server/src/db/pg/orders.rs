//! Order, order item and transition queries

use shared::models::{NewOrder, Order, OrderItem, OrderStatus, OrderTransition, TransitionSource};
use sqlx::PgConnection;

use crate::db::{Page, StoreError, StoreResult};

const COLUMNS: &str =
    "id, customer_id, status, total_price, delivery_address, created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    status: String,
    total_price: rust_decimal::Decimal,
    delivery_address: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> StoreResult<Order> {
        let status = OrderStatus::from_db(&self.status)
            .ok_or_else(|| StoreError::Decode(format!("orders.status = {}", self.status)))?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            status,
            total_price: self.total_price,
            delivery_address: self.delivery_address,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

async fn items_of(conn: &mut PgConnection, order_ids: &[i64]) -> StoreResult<Vec<OrderItem>> {
    Ok(sqlx::query_as(
        r#"
        SELECT id, order_id, menu_id, quantity, price_at_order
        FROM order_items WHERE order_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(order_ids)
    .fetch_all(conn)
    .await?)
}

async fn with_items(conn: &mut PgConnection, row: Option<OrderRow>) -> StoreResult<Option<Order>> {
    let Some(row) = row else {
        return Ok(None);
    };
    let items = items_of(conn, &[row.id]).await?;
    row.into_order(items).map(Some)
}

pub async fn by_id(conn: &mut PgConnection, id: i64) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    with_items(conn, row).await
}

pub async fn for_update(conn: &mut PgConnection, id: i64) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM orders WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    with_items(conn, row).await
}

pub async fn list(
    conn: &mut PgConnection,
    customer_id: Option<i64>,
    page: Page,
) -> StoreResult<(Vec<Order>, u64)> {
    let (total,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM orders
        WHERE deleted_at IS NULL AND ($1::bigint IS NULL OR customer_id = $1)
        "#,
    )
    .bind(customer_id)
    .fetch_one(&mut *conn)
    .await?;

    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM orders
        WHERE deleted_at IS NULL AND ($1::bigint IS NULL OR customer_id = $1)
        ORDER BY id DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(customer_id)
    .bind(i64::from(page.limit))
    .bind(page.offset as i64)
    .fetch_all(&mut *conn)
    .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut items = items_of(conn, &ids).await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let (mine, rest): (Vec<_>, Vec<_>) = items.into_iter().partition(|i| i.order_id == row.id);
        items = rest;
        orders.push(row.into_order(mine)?);
    }
    Ok((orders, total as u64))
}

pub async fn insert(conn: &mut PgConnection, data: &NewOrder, now: i64) -> StoreResult<Order> {
    let row: OrderRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO orders (customer_id, status, total_price, delivery_address,
                            created_at, updated_at)
        VALUES ($1, 'pending', $2, $3, $4, $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.customer_id)
    .bind(data.total_price)
    .bind(&data.delivery_address)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    let mut items = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let saved: OrderItem = sqlx::query_as(
            r#"
            INSERT INTO order_items (order_id, menu_id, quantity, price_at_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, menu_id, quantity, price_at_order
            "#,
        )
        .bind(row.id)
        .bind(item.menu_id)
        .bind(item.quantity)
        .bind(item.price_at_order)
        .fetch_one(&mut *conn)
        .await?;
        items.push(saved);
    }
    row.into_order(items)
}

pub async fn set_status(
    conn: &mut PgConnection,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> StoreResult<()> {
    sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.as_db())
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn soft_delete(conn: &mut PgConnection, id: i64, now: i64) -> StoreResult<()> {
    sqlx::query("UPDATE orders SET deleted_at = $1, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

// ── Transitions ──

#[derive(sqlx::FromRow)]
struct TransitionRow {
    id: i64,
    order_id: i64,
    from_status: Option<String>,
    to_status: String,
    source: String,
    created_at: i64,
}

impl TryFrom<TransitionRow> for OrderTransition {
    type Error = StoreError;

    fn try_from(r: TransitionRow) -> Result<Self, Self::Error> {
        let status = |s: &str| {
            OrderStatus::from_db(s)
                .ok_or_else(|| StoreError::Decode(format!("order_transitions status = {s}")))
        };
        Ok(OrderTransition {
            id: r.id,
            order_id: r.order_id,
            from_status: r.from_status.as_deref().map(status).transpose()?,
            to_status: status(&r.to_status)?,
            source: TransitionSource::from_db(&r.source).ok_or_else(|| {
                StoreError::Decode(format!("order_transitions.source = {}", r.source))
            })?,
            created_at: r.created_at,
        })
    }
}

pub async fn record_transition(
    conn: &mut PgConnection,
    order_id: i64,
    from: Option<OrderStatus>,
    to: OrderStatus,
    source: TransitionSource,
    now: i64,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO order_transitions (order_id, from_status, to_status, source, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(order_id)
    .bind(from.map(|s| s.as_db()))
    .bind(to.as_db())
    .bind(source.as_db())
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn transitions(
    conn: &mut PgConnection,
    order_id: i64,
) -> StoreResult<Vec<OrderTransition>> {
    let rows: Vec<TransitionRow> = sqlx::query_as(
        r#"
        SELECT id, order_id, from_status, to_status, source, created_at
        FROM order_transitions WHERE order_id = $1
        ORDER BY id
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    rows.into_iter().map(OrderTransition::try_from).collect()
}
