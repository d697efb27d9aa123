//! Payment queries. One row per order, enforced by `payments.order_id UNIQUE`.

use shared::models::{NewPayment, Payment, PaymentStatus};
use sqlx::PgConnection;

use crate::db::{StoreError, StoreResult};

const COLUMNS: &str =
    "id, order_id, amount, status, payment_token, payment_url, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    order_id: i64,
    amount: rust_decimal::Decimal,
    status: String,
    payment_token: String,
    payment_url: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = StoreError;

    fn try_from(r: PaymentRow) -> Result<Self, Self::Error> {
        let status = PaymentStatus::from_db(&r.status)
            .ok_or_else(|| StoreError::Decode(format!("payments.status = {}", r.status)))?;
        Ok(Payment {
            id: r.id,
            order_id: r.order_id,
            amount: r.amount,
            status,
            payment_token: r.payment_token,
            payment_url: r.payment_url,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub async fn by_order(conn: &mut PgConnection, order_id: i64) -> StoreResult<Option<Payment>> {
    let row: Option<PaymentRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM payments WHERE order_id = $1 AND deleted_at IS NULL"
    ))
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    row.map(Payment::try_from).transpose()
}

pub async fn for_update(conn: &mut PgConnection, order_id: i64) -> StoreResult<Option<Payment>> {
    let row: Option<PaymentRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM payments WHERE order_id = $1 AND deleted_at IS NULL FOR UPDATE"
    ))
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    row.map(Payment::try_from).transpose()
}

pub async fn insert(
    conn: &mut PgConnection,
    data: &NewPayment,
    now: i64,
) -> StoreResult<Option<Payment>> {
    let row: Option<PaymentRow> = sqlx::query_as(&format!(
        r#"
        INSERT INTO payments (order_id, amount, status, payment_token, payment_url,
                              created_at, updated_at)
        VALUES ($1, $2, 'pending', $3, $4, $5, $5)
        ON CONFLICT (order_id) DO NOTHING
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.order_id)
    .bind(data.amount)
    .bind(&data.payment_token)
    .bind(&data.payment_url)
    .bind(now)
    .fetch_optional(conn)
    .await?;
    row.map(Payment::try_from).transpose()
}

pub async fn set_status(
    conn: &mut PgConnection,
    order_id: i64,
    status: PaymentStatus,
    now: i64,
) -> StoreResult<()> {
    sqlx::query("UPDATE payments SET status = $1, updated_at = $2 WHERE order_id = $3")
        .bind(status.as_db())
        .bind(now)
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn set_checkout(
    conn: &mut PgConnection,
    order_id: i64,
    payment_token: &str,
    payment_url: &str,
    now: i64,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        UPDATE payments SET payment_token = $1, payment_url = $2, updated_at = $3
        WHERE order_id = $4 AND deleted_at IS NULL
        "#,
    )
    .bind(payment_token)
    .bind(payment_url)
    .bind(now)
    .bind(order_id)
    .execute(conn)
    .await?;
    Ok(())
}
