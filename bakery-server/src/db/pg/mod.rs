//! PostgreSQL store
//!
//! Query functions take `&mut PgConnection` so the same SQL serves pooled
//! reads on [`PgStore`] and locked reads inside a [`PgTx`].

mod carts;
mod customers;
mod ingredients;
mod menus;
mod orders;
mod payments;
mod reservations;
mod tables;
mod wishlists;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{
    CartLine, Customer, CustomerUpdate, DiningTable, DiningTableCreate, DiningTableUpdate,
    Ingredient, IngredientCreate, IngredientUpdate, Menu, MenuCreate, MenuUpdate, NewCustomer,
    NewOrder, NewPayment, NewReservation, Order, OrderStatus, OrderTransition, Payment,
    PaymentStatus, Reservation, TransitionSource, WishlistEntry,
};
use sqlx::{PgPool, Postgres, Transaction};

use super::{MenuFilter, Page, Store, StoreResult, StoreTx};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Open transaction; rolled back by sqlx when dropped uncommitted
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn begin_serializable(&self) -> StoreResult<Box<dyn StoreTx>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn customer_by_id(&self, id: i64) -> StoreResult<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;
        customers::by_id(&mut conn, id).await
    }

    async fn customer_by_email(&self, email: &str) -> StoreResult<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;
        customers::by_email(&mut conn, email).await
    }

    async fn insert_customer(&self, data: &NewCustomer, now: i64) -> StoreResult<Customer> {
        let mut conn = self.pool.acquire().await?;
        customers::insert(&mut conn, data, now).await
    }

    async fn update_customer(
        &self,
        id: i64,
        data: &CustomerUpdate,
        now: i64,
    ) -> StoreResult<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;
        customers::update(&mut conn, id, data, now).await
    }

    async fn list_menus(&self, filter: &MenuFilter, page: Page) -> StoreResult<(Vec<Menu>, u64)> {
        let mut conn = self.pool.acquire().await?;
        menus::list(&mut conn, filter, page).await
    }

    async fn menu_by_id(&self, id: i64) -> StoreResult<Option<Menu>> {
        let mut conn = self.pool.acquire().await?;
        menus::by_id(&mut conn, id).await
    }

    async fn insert_menu(&self, data: &MenuCreate, now: i64) -> StoreResult<Menu> {
        let mut conn = self.pool.acquire().await?;
        menus::insert(&mut conn, data, now).await
    }

    async fn update_menu(&self, id: i64, data: &MenuUpdate, now: i64) -> StoreResult<Option<Menu>> {
        let mut conn = self.pool.acquire().await?;
        menus::update(&mut conn, id, data, now).await
    }

    async fn soft_delete_menu(&self, id: i64, now: i64) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        menus::soft_delete(&mut conn, id, now).await
    }

    async fn cart_lines(&self, customer_id: i64) -> StoreResult<Vec<CartLine>> {
        let mut conn = self.pool.acquire().await?;
        carts::lines(&mut conn, customer_id).await
    }

    async fn cart_line(&self, customer_id: i64, line_id: i64) -> StoreResult<Option<CartLine>> {
        let mut conn = self.pool.acquire().await?;
        carts::line(&mut conn, customer_id, line_id).await
    }

    async fn upsert_cart_line(
        &self,
        customer_id: i64,
        menu_id: i64,
        quantity: i32,
        unit_price: Decimal,
        now: i64,
    ) -> StoreResult<CartLine> {
        let mut conn = self.pool.acquire().await?;
        carts::upsert(&mut conn, customer_id, menu_id, quantity, unit_price, now).await
    }

    async fn set_cart_quantity(
        &self,
        customer_id: i64,
        line_id: i64,
        quantity: i32,
        unit_price: Decimal,
        now: i64,
    ) -> StoreResult<Option<CartLine>> {
        let mut conn = self.pool.acquire().await?;
        carts::set_quantity(&mut conn, customer_id, line_id, quantity, unit_price, now).await
    }

    async fn remove_cart_line(
        &self,
        customer_id: i64,
        line_id: i64,
        now: i64,
    ) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        carts::remove(&mut conn, customer_id, line_id, now).await
    }

    async fn clear_cart(&self, customer_id: i64, now: i64) -> StoreResult<u64> {
        let mut conn = self.pool.acquire().await?;
        carts::clear(&mut conn, customer_id, now).await
    }

    async fn wishlist(&self, customer_id: i64) -> StoreResult<Vec<WishlistEntry>> {
        let mut conn = self.pool.acquire().await?;
        wishlists::list(&mut conn, customer_id).await
    }

    async fn insert_wishlist(
        &self,
        customer_id: i64,
        menu_id: i64,
        now: i64,
    ) -> StoreResult<Option<WishlistEntry>> {
        let mut conn = self.pool.acquire().await?;
        wishlists::insert(&mut conn, customer_id, menu_id, now).await
    }

    async fn remove_wishlist(&self, customer_id: i64, menu_id: i64, now: i64) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        wishlists::remove(&mut conn, customer_id, menu_id, now).await
    }

    async fn order_by_id(&self, id: i64) -> StoreResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        orders::by_id(&mut conn, id).await
    }

    async fn list_orders(
        &self,
        customer_id: Option<i64>,
        page: Page,
    ) -> StoreResult<(Vec<Order>, u64)> {
        let mut conn = self.pool.acquire().await?;
        orders::list(&mut conn, customer_id, page).await
    }

    async fn order_transitions(&self, order_id: i64) -> StoreResult<Vec<OrderTransition>> {
        let mut conn = self.pool.acquire().await?;
        orders::transitions(&mut conn, order_id).await
    }

    async fn payment_by_order(&self, order_id: i64) -> StoreResult<Option<Payment>> {
        let mut conn = self.pool.acquire().await?;
        payments::by_order(&mut conn, order_id).await
    }

    async fn reservation_by_id(&self, id: i64) -> StoreResult<Option<Reservation>> {
        let mut conn = self.pool.acquire().await?;
        reservations::by_id(&mut conn, id).await
    }

    async fn list_reservations(
        &self,
        customer_id: Option<i64>,
        page: Page,
    ) -> StoreResult<(Vec<Reservation>, u64)> {
        let mut conn = self.pool.acquire().await?;
        reservations::list(&mut conn, customer_id, page).await
    }

    async fn list_tables(&self) -> StoreResult<Vec<DiningTable>> {
        let mut conn = self.pool.acquire().await?;
        tables::list(&mut conn).await
    }

    async fn table_by_id(&self, id: i64) -> StoreResult<Option<DiningTable>> {
        let mut conn = self.pool.acquire().await?;
        tables::by_id(&mut conn, id).await
    }

    async fn insert_table(&self, data: &DiningTableCreate, now: i64) -> StoreResult<DiningTable> {
        let mut conn = self.pool.acquire().await?;
        tables::insert(&mut conn, data, now).await
    }

    async fn update_table(
        &self,
        id: i64,
        data: &DiningTableUpdate,
        now: i64,
    ) -> StoreResult<Option<DiningTable>> {
        let mut conn = self.pool.acquire().await?;
        tables::update(&mut conn, id, data, now).await
    }

    async fn soft_delete_table(&self, id: i64, now: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = tables::soft_delete(&mut tx, id, now).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn list_ingredients(&self) -> StoreResult<Vec<Ingredient>> {
        let mut conn = self.pool.acquire().await?;
        ingredients::list(&mut conn).await
    }

    async fn ingredient_by_id(&self, id: i64) -> StoreResult<Option<Ingredient>> {
        let mut conn = self.pool.acquire().await?;
        ingredients::by_id(&mut conn, id).await
    }

    async fn insert_ingredient(
        &self,
        data: &IngredientCreate,
        now: i64,
    ) -> StoreResult<Ingredient> {
        let mut conn = self.pool.acquire().await?;
        ingredients::insert(&mut conn, data, now).await
    }

    async fn update_ingredient(
        &self,
        id: i64,
        data: &IngredientUpdate,
        now: i64,
    ) -> StoreResult<Option<Ingredient>> {
        let mut conn = self.pool.acquire().await?;
        ingredients::update(&mut conn, id, data, now).await
    }

    async fn soft_delete_ingredient(&self, id: i64, now: i64) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        ingredients::soft_delete(&mut conn, id, now).await
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn live_menus(&mut self, ids: &[i64]) -> StoreResult<Vec<Menu>> {
        menus::live_for_share(&mut self.tx, ids).await
    }

    async fn insert_order(&mut self, data: &NewOrder, now: i64) -> StoreResult<Order> {
        orders::insert(&mut self.tx, data, now).await
    }

    async fn order_for_update(&mut self, id: i64) -> StoreResult<Option<Order>> {
        orders::for_update(&mut self.tx, id).await
    }

    async fn set_order_status(
        &mut self,
        id: i64,
        status: OrderStatus,
        now: i64,
    ) -> StoreResult<()> {
        orders::set_status(&mut self.tx, id, status, now).await
    }

    async fn record_transition(
        &mut self,
        order_id: i64,
        from: Option<OrderStatus>,
        to: OrderStatus,
        source: TransitionSource,
        now: i64,
    ) -> StoreResult<()> {
        orders::record_transition(&mut self.tx, order_id, from, to, source, now).await
    }

    async fn soft_delete_order(&mut self, id: i64, now: i64) -> StoreResult<()> {
        orders::soft_delete(&mut self.tx, id, now).await
    }

    async fn payment_for_update(&mut self, order_id: i64) -> StoreResult<Option<Payment>> {
        payments::for_update(&mut self.tx, order_id).await
    }

    async fn insert_payment(
        &mut self,
        data: &NewPayment,
        now: i64,
    ) -> StoreResult<Option<Payment>> {
        payments::insert(&mut self.tx, data, now).await
    }

    async fn set_payment_status(
        &mut self,
        order_id: i64,
        status: PaymentStatus,
        now: i64,
    ) -> StoreResult<()> {
        payments::set_status(&mut self.tx, order_id, status, now).await
    }

    async fn set_payment_checkout(
        &mut self,
        order_id: i64,
        payment_token: &str,
        payment_url: &str,
        now: i64,
    ) -> StoreResult<()> {
        payments::set_checkout(&mut self.tx, order_id, payment_token, payment_url, now).await
    }

    async fn table_for_update(&mut self, id: i64) -> StoreResult<Option<DiningTable>> {
        tables::for_update(&mut self.tx, id).await
    }

    async fn has_active_reservation(
        &mut self,
        table_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        exclude: Option<i64>,
    ) -> StoreResult<bool> {
        reservations::has_active(&mut self.tx, table_id, from, until, exclude).await
    }

    async fn insert_reservation(
        &mut self,
        data: &NewReservation,
        now: i64,
    ) -> StoreResult<Reservation> {
        reservations::insert(&mut self.tx, data, now).await
    }

    async fn reservation_for_update(&mut self, id: i64) -> StoreResult<Option<Reservation>> {
        reservations::for_update(&mut self.tx, id).await
    }

    async fn update_reservation(
        &mut self,
        reservation: &Reservation,
        now: i64,
    ) -> StoreResult<Reservation> {
        reservations::update(&mut self.tx, reservation, now).await
    }

    async fn soft_delete_reservation(&mut self, id: i64, now: i64) -> StoreResult<()> {
        reservations::soft_delete(&mut self.tx, id, now).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
