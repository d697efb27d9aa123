//! Reservation queries

use chrono::{DateTime, Utc};
use shared::models::{NewReservation, Reservation, ReservationStatus};
use sqlx::PgConnection;

use crate::db::{Page, StoreError, StoreResult};

const COLUMNS: &str = "id, customer_id, table_id, table_number, guest_count, reserve_date, \
                       status, special_notes, created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    customer_id: i64,
    table_id: Option<i64>,
    table_number: i32,
    guest_count: i32,
    reserve_date: DateTime<Utc>,
    status: String,
    special_notes: Option<String>,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(r: ReservationRow) -> Result<Self, Self::Error> {
        let status = ReservationStatus::from_db(&r.status)
            .ok_or_else(|| StoreError::Decode(format!("reservations.status = {}", r.status)))?;
        Ok(Reservation {
            id: r.id,
            customer_id: r.customer_id,
            table_id: r.table_id,
            table_number: r.table_number,
            guest_count: r.guest_count,
            reserve_date: r.reserve_date,
            status,
            special_notes: r.special_notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        })
    }
}

fn decode(row: Option<ReservationRow>) -> StoreResult<Option<Reservation>> {
    row.map(Reservation::try_from).transpose()
}

pub async fn by_id(conn: &mut PgConnection, id: i64) -> StoreResult<Option<Reservation>> {
    let row = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM reservations WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    decode(row)
}

pub async fn for_update(conn: &mut PgConnection, id: i64) -> StoreResult<Option<Reservation>> {
    let row = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM reservations WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    decode(row)
}

pub async fn list(
    conn: &mut PgConnection,
    customer_id: Option<i64>,
    page: Page,
) -> StoreResult<(Vec<Reservation>, u64)> {
    let (total,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM reservations
        WHERE deleted_at IS NULL AND ($1::bigint IS NULL OR customer_id = $1)
        "#,
    )
    .bind(customer_id)
    .fetch_one(&mut *conn)
    .await?;

    let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
        r#"
        SELECT {COLUMNS} FROM reservations
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

    let reservations = rows
        .into_iter()
        .map(Reservation::try_from)
        .collect::<StoreResult<Vec<_>>>()?;
    Ok((reservations, total as u64))
}

pub async fn has_active(
    conn: &mut PgConnection,
    table_id: i64,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
    exclude: Option<i64>,
) -> StoreResult<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM reservations
            WHERE table_id = $1
              AND deleted_at IS NULL
              AND status IN ('pending', 'confirmed')
              AND reserve_date >= $2 AND reserve_date < $3
              AND ($4::bigint IS NULL OR id <> $4)
        )
        "#,
    )
    .bind(table_id)
    .bind(from)
    .bind(until)
    .bind(exclude)
    .fetch_one(conn)
    .await?;
    Ok(exists)
}

pub async fn insert(
    conn: &mut PgConnection,
    data: &NewReservation,
    now: i64,
) -> StoreResult<Reservation> {
    let row: ReservationRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO reservations (customer_id, table_id, table_number, guest_count, reserve_date,
                                  status, special_notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(data.customer_id)
    .bind(data.table_id)
    .bind(data.table_number)
    .bind(data.guest_count)
    .bind(data.reserve_date)
    .bind(&data.special_notes)
    .bind(now)
    .fetch_one(conn)
    .await?;
    row.try_into()
}

pub async fn update(
    conn: &mut PgConnection,
    r: &Reservation,
    now: i64,
) -> StoreResult<Reservation> {
    let row: ReservationRow = sqlx::query_as(&format!(
        r#"
        UPDATE reservations SET
            table_id = $1,
            table_number = $2,
            guest_count = $3,
            reserve_date = $4,
            status = $5,
            special_notes = $6,
            updated_at = $7
        WHERE id = $8
        RETURNING {COLUMNS}
        "#
    ))
    .bind(r.table_id)
    .bind(r.table_number)
    .bind(r.guest_count)
    .bind(r.reserve_date)
    .bind(r.status.as_db())
    .bind(&r.special_notes)
    .bind(now)
    .bind(r.id)
    .fetch_one(conn)
    .await?;
    row.try_into()
}

pub async fn soft_delete(conn: &mut PgConnection, id: i64, now: i64) -> StoreResult<()> {
    sqlx::query("UPDATE reservations SET deleted_at = $1, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
