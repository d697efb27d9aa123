//! Persistence port
//!
//! [`Store`] covers plain reads and single-statement writes. Every
//! read-modify-write sequence on an order, payment or reservation runs on a
//! [`StoreTx`] from [`Store::begin`] / [`Store::begin_serializable`]; dropping
//! the transaction without [`StoreTx::commit`] rolls it back.
//!
//! All reads filter soft-deleted rows.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{
    CartLine, Customer, CustomerUpdate, DiningTable, DiningTableCreate, DiningTableUpdate,
    Ingredient, IngredientCreate, IngredientUpdate, Menu, MenuCreate, MenuUpdate, NewCustomer,
    NewOrder, NewPayment, NewReservation, Order, OrderStatus, OrderTransition, Payment,
    PaymentStatus, Reservation, TransitionSource, WishlistEntry,
};
use thiserror::Error;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Storage failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    /// SQLSTATE 40001 / 40P01; the whole transaction may be retried
    #[error("transaction could not be serialized")]
    Serialization,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("corrupt row: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                Some("40001") | Some("40P01") => return StoreError::Serialization,
                Some("23505") => {
                    return StoreError::UniqueViolation(
                        db.constraint().unwrap_or("unknown").to_string(),
                    );
                }
                _ => {}
            }
        }
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Menu list filters
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub category: Option<String>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
}

/// Limit/offset window for list reads
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: u32,
    pub offset: u64,
}

#[async_trait]
pub trait Store: Send + Sync {
    // ── Transactions ──

    /// Read-committed transaction; row locks via `*_for_update`
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;
    /// SERIALIZABLE transaction; commit may fail with [`StoreError::Serialization`]
    async fn begin_serializable(&self) -> StoreResult<Box<dyn StoreTx>>;

    // ── Customers ──

    async fn customer_by_id(&self, id: i64) -> StoreResult<Option<Customer>>;
    async fn customer_by_email(&self, email: &str) -> StoreResult<Option<Customer>>;
    async fn insert_customer(&self, data: &NewCustomer, now: i64) -> StoreResult<Customer>;
    async fn update_customer(
        &self,
        id: i64,
        data: &CustomerUpdate,
        now: i64,
    ) -> StoreResult<Option<Customer>>;

    // ── Menus ──

    async fn list_menus(&self, filter: &MenuFilter, page: Page) -> StoreResult<(Vec<Menu>, u64)>;
    async fn menu_by_id(&self, id: i64) -> StoreResult<Option<Menu>>;
    async fn insert_menu(&self, data: &MenuCreate, now: i64) -> StoreResult<Menu>;
    async fn update_menu(&self, id: i64, data: &MenuUpdate, now: i64) -> StoreResult<Option<Menu>>;
    async fn soft_delete_menu(&self, id: i64, now: i64) -> StoreResult<bool>;

    // ── Cart ──

    async fn cart_lines(&self, customer_id: i64) -> StoreResult<Vec<CartLine>>;
    async fn cart_line(&self, customer_id: i64, line_id: i64) -> StoreResult<Option<CartLine>>;
    /// Insert or merge into the live `(customer_id, menu_id)` line in one
    /// atomic statement: quantities add up, `unit_price` becomes `unit_price`
    /// and the subtotal is recomputed from it.
    async fn upsert_cart_line(
        &self,
        customer_id: i64,
        menu_id: i64,
        quantity: i32,
        unit_price: Decimal,
        now: i64,
    ) -> StoreResult<CartLine>;
    async fn set_cart_quantity(
        &self,
        customer_id: i64,
        line_id: i64,
        quantity: i32,
        unit_price: Decimal,
        now: i64,
    ) -> StoreResult<Option<CartLine>>;
    async fn remove_cart_line(&self, customer_id: i64, line_id: i64, now: i64) -> StoreResult<bool>;
    async fn clear_cart(&self, customer_id: i64, now: i64) -> StoreResult<u64>;

    // ── Wishlist ──

    async fn wishlist(&self, customer_id: i64) -> StoreResult<Vec<WishlistEntry>>;
    /// `None` when a live entry for the pair already exists
    async fn insert_wishlist(
        &self,
        customer_id: i64,
        menu_id: i64,
        now: i64,
    ) -> StoreResult<Option<WishlistEntry>>;
    async fn remove_wishlist(&self, customer_id: i64, menu_id: i64, now: i64) -> StoreResult<bool>;

    // ── Orders & payments (reads) ──

    async fn order_by_id(&self, id: i64) -> StoreResult<Option<Order>>;
    /// `customer_id = None` lists every customer's orders
    async fn list_orders(
        &self,
        customer_id: Option<i64>,
        page: Page,
    ) -> StoreResult<(Vec<Order>, u64)>;
    async fn order_transitions(&self, order_id: i64) -> StoreResult<Vec<OrderTransition>>;
    async fn payment_by_order(&self, order_id: i64) -> StoreResult<Option<Payment>>;

    // ── Reservations (reads) ──

    async fn reservation_by_id(&self, id: i64) -> StoreResult<Option<Reservation>>;
    async fn list_reservations(
        &self,
        customer_id: Option<i64>,
        page: Page,
    ) -> StoreResult<(Vec<Reservation>, u64)>;

    // ── Tables ──

    async fn list_tables(&self) -> StoreResult<Vec<DiningTable>>;
    async fn table_by_id(&self, id: i64) -> StoreResult<Option<DiningTable>>;
    async fn insert_table(&self, data: &DiningTableCreate, now: i64) -> StoreResult<DiningTable>;
    async fn update_table(
        &self,
        id: i64,
        data: &DiningTableUpdate,
        now: i64,
    ) -> StoreResult<Option<DiningTable>>;
    /// Soft-deletes the table and detaches live reservations from it
    async fn soft_delete_table(&self, id: i64, now: i64) -> StoreResult<bool>;

    // ── Ingredients ──

    async fn list_ingredients(&self) -> StoreResult<Vec<Ingredient>>;
    async fn ingredient_by_id(&self, id: i64) -> StoreResult<Option<Ingredient>>;
    async fn insert_ingredient(&self, data: &IngredientCreate, now: i64) -> StoreResult<Ingredient>;
    async fn update_ingredient(
        &self,
        id: i64,
        data: &IngredientUpdate,
        now: i64,
    ) -> StoreResult<Option<Ingredient>>;
    async fn soft_delete_ingredient(&self, id: i64, now: i64) -> StoreResult<bool>;
}

/// Unit of work. Reads ending in `_for_update` lock the row until commit.
#[async_trait]
pub trait StoreTx: Send {
    /// Live menus among `ids`, share-locked so they cannot be deleted underneath
    async fn live_menus(&mut self, ids: &[i64]) -> StoreResult<Vec<Menu>>;

    async fn insert_order(&mut self, data: &NewOrder, now: i64) -> StoreResult<Order>;
    async fn order_for_update(&mut self, id: i64) -> StoreResult<Option<Order>>;
    async fn set_order_status(&mut self, id: i64, status: OrderStatus, now: i64) -> StoreResult<()>;
    async fn record_transition(
        &mut self,
        order_id: i64,
        from: Option<OrderStatus>,
        to: OrderStatus,
        source: TransitionSource,
        now: i64,
    ) -> StoreResult<()>;
    async fn soft_delete_order(&mut self, id: i64, now: i64) -> StoreResult<()>;

    async fn payment_for_update(&mut self, order_id: i64) -> StoreResult<Option<Payment>>;
    /// `None` when the order already has a payment row
    async fn insert_payment(&mut self, data: &NewPayment, now: i64) -> StoreResult<Option<Payment>>;
    async fn set_payment_status(
        &mut self,
        order_id: i64,
        status: PaymentStatus,
        now: i64,
    ) -> StoreResult<()>;
    /// Attach the hosted-checkout token and redirect to an existing row
    async fn set_payment_checkout(
        &mut self,
        order_id: i64,
        payment_token: &str,
        payment_url: &str,
        now: i64,
    ) -> StoreResult<()>;

    async fn table_for_update(&mut self, id: i64) -> StoreResult<Option<DiningTable>>;
    /// Any reservation on `table_id` in `[from, until)` that is still active,
    /// ignoring `exclude`
    async fn has_active_reservation(
        &mut self,
        table_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        exclude: Option<i64>,
    ) -> StoreResult<bool>;
    async fn insert_reservation(
        &mut self,
        data: &NewReservation,
        now: i64,
    ) -> StoreResult<Reservation>;
    async fn reservation_for_update(&mut self, id: i64) -> StoreResult<Option<Reservation>>;
    /// Persist the mutable fields of `reservation`
    async fn update_reservation(
        &mut self,
        reservation: &Reservation,
        now: i64,
    ) -> StoreResult<Reservation>;
    async fn soft_delete_reservation(&mut self, id: i64, now: i64) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
