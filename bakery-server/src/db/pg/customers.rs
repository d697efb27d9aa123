//! Customer queries

use shared::models::{Customer, CustomerUpdate, NewCustomer, Role};
use sqlx::PgConnection;

use crate::db::{StoreError, StoreResult};

const COLUMNS: &str =
    "id, email, password_hash, name, address, role, created_at, updated_at, deleted_at";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    email: String,
    password_hash: String,
    name: String,
    address: Option<String>,
    role: String,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(r: CustomerRow) -> Result<Self, Self::Error> {
        let role = Role::from_db(&r.role)
            .ok_or_else(|| StoreError::Decode(format!("customers.role = {}", r.role)))?;
        Ok(Customer {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            name: r.name,
            address: r.address,
            role,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        })
    }
}

fn decode(row: Option<CustomerRow>) -> StoreResult<Option<Customer>> {
    row.map(Customer::try_from).transpose()
}

pub async fn by_id(conn: &mut PgConnection, id: i64) -> StoreResult<Option<Customer>> {
    let row: Option<CustomerRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM customers WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    decode(row)
}

pub async fn by_email(conn: &mut PgConnection, email: &str) -> StoreResult<Option<Customer>> {
    let row: Option<CustomerRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM customers WHERE email = $1 AND deleted_at IS NULL"
    ))
    .bind(email)
    .fetch_optional(conn)
    .await?;
    decode(row)
}

pub async fn insert(
    conn: &mut PgConnection,
    data: &NewCustomer,
    now: i64,
) -> StoreResult<Customer> {
    let row: CustomerRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO customers (email, password_hash, name, address, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.name)
    .bind(&data.address)
    .bind(data.role.as_db())
    .bind(now)
    .fetch_one(conn)
    .await?;
    row.try_into()
}

pub async fn update(
    conn: &mut PgConnection,
    id: i64,
    data: &CustomerUpdate,
    now: i64,
) -> StoreResult<Option<Customer>> {
    let row: Option<CustomerRow> = sqlx::query_as(&format!(
        r#"
        UPDATE customers SET
            name = COALESCE($1, name),
            address = COALESCE($2, address),
            updated_at = $3
        WHERE id = $4 AND deleted_at IS NULL
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&data.name)
    .bind(&data.address)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    decode(row)
}
