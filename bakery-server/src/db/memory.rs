//! In-process store
//!
//! One `tokio::sync::Mutex` guards all tables. A transaction holds the lock
//! for its whole lifetime and mutates a working copy that replaces the
//! shared state on commit, so transactions are serial and a dropped one
//! leaves no trace. Used by the test-suite and for running without Postgres.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use shared::models::{
    CartLine, Customer, CustomerUpdate, DiningTable, DiningTableCreate, DiningTableUpdate,
    Ingredient, IngredientCreate, IngredientUpdate, Menu, MenuCreate, MenuUpdate, NewCustomer,
    NewOrder, NewPayment, NewReservation, Order, OrderItem, OrderStatus, OrderTransition, Payment,
    PaymentStatus, Reservation, ReservationStatus, TransitionSource, WishlistEntry,
};

use super::{MenuFilter, Page, Store, StoreError, StoreResult, StoreTx};

#[derive(Debug, Default, Clone)]
struct Tables {
    seq: i64,
    customers: BTreeMap<i64, Customer>,
    menus: BTreeMap<i64, Menu>,
    carts: BTreeMap<i64, CartLine>,
    wishlists: BTreeMap<i64, WishlistEntry>,
    orders: BTreeMap<i64, Order>,
    transitions: Vec<OrderTransition>,
    payments: BTreeMap<i64, Payment>,
    reservations: BTreeMap<i64, Reservation>,
    tables: BTreeMap<i64, DiningTable>,
    ingredients: BTreeMap<i64, Ingredient>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.seq += 1;
        self.seq
    }

    fn live_order(&self, id: i64) -> Option<&Order> {
        self.orders.get(&id).filter(|o| o.deleted_at.is_none())
    }

    fn payment_of(&self, order_id: i64) -> Option<&Payment> {
        self.payments.values().find(|p| p.order_id == order_id)
    }

    fn payment_of_mut(&mut self, order_id: i64) -> Option<&mut Payment> {
        self.payments.values_mut().find(|p| p.order_id == order_id)
    }

    fn live_reservation(&self, id: i64) -> Option<&Reservation> {
        self.reservations.get(&id).filter(|r| r.deleted_at.is_none())
    }

    fn live_table(&self, id: i64) -> Option<&DiningTable> {
        self.tables.get(&id).filter(|t| t.deleted_at.is_none())
    }

    fn table_number_taken(&self, number: i32, except: Option<i64>) -> bool {
        self.tables
            .values()
            .any(|t| t.deleted_at.is_none() && t.table_number == number && Some(t.id) != except)
    }

    fn ingredient_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.ingredients
            .values()
            .any(|i| i.deleted_at.is_none() && i.name == name && Some(i.id) != except)
    }
}

fn paginate<T>(rows: Vec<T>, page: Page) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect();
    (items, total)
}

/// In-memory [`Store`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn open_tx(&self) -> Box<dyn StoreTx> {
        let guard = self.inner.clone().lock_owned().await;
        let work = guard.clone();
        Box::new(MemoryTx { guard, work })
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        Ok(self.open_tx().await)
    }

    async fn begin_serializable(&self) -> StoreResult<Box<dyn StoreTx>> {
        Ok(self.open_tx().await)
    }

    // ── Customers ──

    async fn customer_by_id(&self, id: i64) -> StoreResult<Option<Customer>> {
        let t = self.inner.lock().await;
        Ok(t.customers.get(&id).filter(|c| c.deleted_at.is_none()).cloned())
    }

    async fn customer_by_email(&self, email: &str) -> StoreResult<Option<Customer>> {
        let t = self.inner.lock().await;
        Ok(t.customers
            .values()
            .find(|c| c.deleted_at.is_none() && c.email == email)
            .cloned())
    }

    async fn insert_customer(&self, data: &NewCustomer, now: i64) -> StoreResult<Customer> {
        let mut t = self.inner.lock().await;
        if t.customers
            .values()
            .any(|c| c.deleted_at.is_none() && c.email == data.email)
        {
            return Err(StoreError::UniqueViolation("customers_email_live".into()));
        }
        let id = t.next_id();
        let customer = Customer {
            id,
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            name: data.name.clone(),
            address: data.address.clone(),
            role: data.role,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        id: i64,
        data: &CustomerUpdate,
        now: i64,
    ) -> StoreResult<Option<Customer>> {
        let mut t = self.inner.lock().await;
        let Some(c) = t.customers.get_mut(&id).filter(|c| c.deleted_at.is_none()) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            c.name = name.clone();
        }
        if let Some(address) = &data.address {
            c.address = Some(address.clone());
        }
        c.updated_at = now;
        Ok(Some(c.clone()))
    }

    // ── Menus ──

    async fn list_menus(&self, filter: &MenuFilter, page: Page) -> StoreResult<(Vec<Menu>, u64)> {
        let t = self.inner.lock().await;
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let rows: Vec<Menu> = t
            .menus
            .values()
            .filter(|m| m.deleted_at.is_none())
            .filter(|m| match &filter.category {
                Some(cat) => m.category.as_deref() == Some(cat.as_str()),
                None => true,
            })
            .filter(|m| match &search {
                Some(s) => {
                    m.title.to_lowercase().contains(s)
                        || m.description
                            .as_ref()
                            .is_some_and(|d| d.to_lowercase().contains(s))
                }
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }

    async fn menu_by_id(&self, id: i64) -> StoreResult<Option<Menu>> {
        let t = self.inner.lock().await;
        Ok(t.menus.get(&id).filter(|m| m.deleted_at.is_none()).cloned())
    }

    async fn insert_menu(&self, data: &MenuCreate, now: i64) -> StoreResult<Menu> {
        let mut t = self.inner.lock().await;
        let id = t.next_id();
        let menu = Menu {
            id,
            title: data.title.clone(),
            description: data.description.clone(),
            price: data.price,
            quantity: data.quantity,
            category: data.category.clone(),
            rating: data.rating,
            image_url: data.image_url.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.menus.insert(id, menu.clone());
        Ok(menu)
    }

    async fn update_menu(&self, id: i64, data: &MenuUpdate, now: i64) -> StoreResult<Option<Menu>> {
        let mut t = self.inner.lock().await;
        let Some(m) = t.menus.get_mut(&id).filter(|m| m.deleted_at.is_none()) else {
            return Ok(None);
        };
        if let Some(v) = &data.title {
            m.title = v.clone();
        }
        if let Some(v) = &data.description {
            m.description = Some(v.clone());
        }
        if let Some(v) = data.price {
            m.price = v;
        }
        if let Some(v) = data.quantity {
            m.quantity = v;
        }
        if let Some(v) = &data.category {
            m.category = Some(v.clone());
        }
        if let Some(v) = data.rating {
            m.rating = v;
        }
        if let Some(v) = &data.image_url {
            m.image_url = Some(v.clone());
        }
        m.updated_at = now;
        Ok(Some(m.clone()))
    }

    async fn soft_delete_menu(&self, id: i64, now: i64) -> StoreResult<bool> {
        let mut t = self.inner.lock().await;
        match t.menus.get_mut(&id).filter(|m| m.deleted_at.is_none()) {
            Some(m) => {
                m.deleted_at = Some(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Cart ──

    async fn cart_lines(&self, customer_id: i64) -> StoreResult<Vec<CartLine>> {
        let t = self.inner.lock().await;
        Ok(t.carts
            .values()
            .filter(|c| c.deleted_at.is_none() && c.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn cart_line(&self, customer_id: i64, line_id: i64) -> StoreResult<Option<CartLine>> {
        let t = self.inner.lock().await;
        Ok(t.carts
            .get(&line_id)
            .filter(|c| c.deleted_at.is_none() && c.customer_id == customer_id)
            .cloned())
    }

    async fn upsert_cart_line(
        &self,
        customer_id: i64,
        menu_id: i64,
        quantity: i32,
        unit_price: Decimal,
        now: i64,
    ) -> StoreResult<CartLine> {
        let mut t = self.inner.lock().await;
        if let Some(line) = t.carts.values_mut().find(|c| {
            c.deleted_at.is_none() && c.customer_id == customer_id && c.menu_id == menu_id
        }) {
            line.quantity += quantity;
            line.unit_price = unit_price;
            line.subtotal = unit_price * Decimal::from(line.quantity);
            line.updated_at = now;
            return Ok(line.clone());
        }
        let id = t.next_id();
        let line = CartLine {
            id,
            customer_id,
            menu_id,
            quantity,
            unit_price,
            subtotal: unit_price * Decimal::from(quantity),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.carts.insert(id, line.clone());
        Ok(line)
    }

    async fn set_cart_quantity(
        &self,
        customer_id: i64,
        line_id: i64,
        quantity: i32,
        unit_price: Decimal,
        now: i64,
    ) -> StoreResult<Option<CartLine>> {
        let mut t = self.inner.lock().await;
        let Some(line) = t
            .carts
            .get_mut(&line_id)
            .filter(|c| c.deleted_at.is_none() && c.customer_id == customer_id)
        else {
            return Ok(None);
        };
        line.quantity = quantity;
        line.unit_price = unit_price;
        line.subtotal = unit_price * Decimal::from(quantity);
        line.updated_at = now;
        Ok(Some(line.clone()))
    }

    async fn remove_cart_line(
        &self,
        customer_id: i64,
        line_id: i64,
        now: i64,
    ) -> StoreResult<bool> {
        let mut t = self.inner.lock().await;
        match t
            .carts
            .get_mut(&line_id)
            .filter(|c| c.deleted_at.is_none() && c.customer_id == customer_id)
        {
            Some(line) => {
                line.deleted_at = Some(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_cart(&self, customer_id: i64, now: i64) -> StoreResult<u64> {
        let mut t = self.inner.lock().await;
        let mut n = 0;
        for line in t
            .carts
            .values_mut()
            .filter(|c| c.deleted_at.is_none() && c.customer_id == customer_id)
        {
            line.deleted_at = Some(now);
            n += 1;
        }
        Ok(n)
    }

    // ── Wishlist ──

    async fn wishlist(&self, customer_id: i64) -> StoreResult<Vec<WishlistEntry>> {
        let t = self.inner.lock().await;
        Ok(t.wishlists
            .values()
            .filter(|w| w.deleted_at.is_none() && w.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn insert_wishlist(
        &self,
        customer_id: i64,
        menu_id: i64,
        now: i64,
    ) -> StoreResult<Option<WishlistEntry>> {
        let mut t = self.inner.lock().await;
        if t.wishlists.values().any(|w| {
            w.deleted_at.is_none() && w.customer_id == customer_id && w.menu_id == menu_id
        }) {
            return Ok(None);
        }
        let id = t.next_id();
        let entry = WishlistEntry {
            id,
            customer_id,
            menu_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.wishlists.insert(id, entry.clone());
        Ok(Some(entry))
    }

    async fn remove_wishlist(&self, customer_id: i64, menu_id: i64, now: i64) -> StoreResult<bool> {
        let mut t = self.inner.lock().await;
        match t.wishlists.values_mut().find(|w| {
            w.deleted_at.is_none() && w.customer_id == customer_id && w.menu_id == menu_id
        }) {
            Some(w) => {
                w.deleted_at = Some(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Orders & payments ──

    async fn order_by_id(&self, id: i64) -> StoreResult<Option<Order>> {
        let t = self.inner.lock().await;
        Ok(t.live_order(id).cloned())
    }

    async fn list_orders(
        &self,
        customer_id: Option<i64>,
        page: Page,
    ) -> StoreResult<(Vec<Order>, u64)> {
        let t = self.inner.lock().await;
        let rows: Vec<Order> = t
            .orders
            .values()
            .rev()
            .filter(|o| o.deleted_at.is_none())
            .filter(|o| customer_id.is_none_or(|c| o.customer_id == c))
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }

    async fn order_transitions(&self, order_id: i64) -> StoreResult<Vec<OrderTransition>> {
        let t = self.inner.lock().await;
        Ok(t.transitions
            .iter()
            .filter(|tr| tr.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn payment_by_order(&self, order_id: i64) -> StoreResult<Option<Payment>> {
        let t = self.inner.lock().await;
        Ok(t.payment_of(order_id).cloned())
    }

    // ── Reservations ──

    async fn reservation_by_id(&self, id: i64) -> StoreResult<Option<Reservation>> {
        let t = self.inner.lock().await;
        Ok(t.live_reservation(id).cloned())
    }

    async fn list_reservations(
        &self,
        customer_id: Option<i64>,
        page: Page,
    ) -> StoreResult<(Vec<Reservation>, u64)> {
        let t = self.inner.lock().await;
        let rows: Vec<Reservation> = t
            .reservations
            .values()
            .rev()
            .filter(|r| r.deleted_at.is_none())
            .filter(|r| customer_id.is_none_or(|c| r.customer_id == c))
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }

    // ── Tables ──

    async fn list_tables(&self) -> StoreResult<Vec<DiningTable>> {
        let t = self.inner.lock().await;
        let mut rows: Vec<DiningTable> = t
            .tables
            .values()
            .filter(|d| d.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by_key(|d| d.table_number);
        Ok(rows)
    }

    async fn table_by_id(&self, id: i64) -> StoreResult<Option<DiningTable>> {
        let t = self.inner.lock().await;
        Ok(t.live_table(id).cloned())
    }

    async fn insert_table(&self, data: &DiningTableCreate, now: i64) -> StoreResult<DiningTable> {
        let mut t = self.inner.lock().await;
        if t.table_number_taken(data.table_number, None) {
            return Err(StoreError::UniqueViolation("tables_number_live".into()));
        }
        let id = t.next_id();
        let table = DiningTable {
            id,
            table_number: data.table_number,
            capacity: data.capacity,
            is_available: data.is_available.unwrap_or(true),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.tables.insert(id, table.clone());
        Ok(table)
    }

    async fn update_table(
        &self,
        id: i64,
        data: &DiningTableUpdate,
        now: i64,
    ) -> StoreResult<Option<DiningTable>> {
        let mut t = self.inner.lock().await;
        if t.live_table(id).is_none() {
            return Ok(None);
        }
        if let Some(number) = data.table_number
            && t.table_number_taken(number, Some(id))
        {
            return Err(StoreError::UniqueViolation("tables_number_live".into()));
        }
        let Some(table) = t.tables.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = data.table_number {
            table.table_number = v;
        }
        if let Some(v) = data.capacity {
            table.capacity = v;
        }
        if let Some(v) = data.is_available {
            table.is_available = v;
        }
        table.updated_at = now;
        Ok(Some(table.clone()))
    }

    async fn soft_delete_table(&self, id: i64, now: i64) -> StoreResult<bool> {
        let mut t = self.inner.lock().await;
        let Some(table) = t.tables.get_mut(&id).filter(|d| d.deleted_at.is_none()) else {
            return Ok(false);
        };
        table.deleted_at = Some(now);
        for r in t
            .reservations
            .values_mut()
            .filter(|r| r.deleted_at.is_none() && r.table_id == Some(id))
        {
            r.table_id = None;
            r.updated_at = now;
        }
        Ok(true)
    }

    // ── Ingredients ──

    async fn list_ingredients(&self) -> StoreResult<Vec<Ingredient>> {
        let t = self.inner.lock().await;
        Ok(t.ingredients
            .values()
            .filter(|i| i.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn ingredient_by_id(&self, id: i64) -> StoreResult<Option<Ingredient>> {
        let t = self.inner.lock().await;
        Ok(t.ingredients
            .get(&id)
            .filter(|i| i.deleted_at.is_none())
            .cloned())
    }

    async fn insert_ingredient(
        &self,
        data: &IngredientCreate,
        now: i64,
    ) -> StoreResult<Ingredient> {
        let mut t = self.inner.lock().await;
        if t.ingredient_name_taken(&data.name, None) {
            return Err(StoreError::UniqueViolation("ingredients_name_live".into()));
        }
        let id = t.next_id();
        let ingredient = Ingredient {
            id,
            name: data.name.clone(),
            quantity: data.quantity,
            unit: data.unit.clone(),
            reorder_level: data.reorder_level,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.ingredients.insert(id, ingredient.clone());
        Ok(ingredient)
    }

    async fn update_ingredient(
        &self,
        id: i64,
        data: &IngredientUpdate,
        now: i64,
    ) -> StoreResult<Option<Ingredient>> {
        let mut t = self.inner.lock().await;
        if t.ingredients
            .get(&id)
            .filter(|i| i.deleted_at.is_none())
            .is_none()
        {
            return Ok(None);
        }
        if let Some(name) = &data.name
            && t.ingredient_name_taken(name, Some(id))
        {
            return Err(StoreError::UniqueViolation("ingredients_name_live".into()));
        }
        let Some(i) = t.ingredients.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(v) = &data.name {
            i.name = v.clone();
        }
        if let Some(v) = data.quantity {
            i.quantity = v;
        }
        if let Some(v) = &data.unit {
            i.unit = v.clone();
        }
        if let Some(v) = data.reorder_level {
            i.reorder_level = v;
        }
        i.updated_at = now;
        Ok(Some(i.clone()))
    }

    async fn soft_delete_ingredient(&self, id: i64, now: i64) -> StoreResult<bool> {
        let mut t = self.inner.lock().await;
        match t.ingredients.get_mut(&id).filter(|i| i.deleted_at.is_none()) {
            Some(i) => {
                i.deleted_at = Some(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Transaction over a private copy of the tables
struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn live_menus(&mut self, ids: &[i64]) -> StoreResult<Vec<Menu>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.work.menus.get(id))
            .filter(|m| m.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn insert_order(&mut self, data: &NewOrder, now: i64) -> StoreResult<Order> {
        let id = self.work.next_id();
        let mut items = Vec::with_capacity(data.items.len());
        for item in &data.items {
            items.push(OrderItem {
                id: self.work.next_id(),
                order_id: id,
                menu_id: item.menu_id,
                quantity: item.quantity,
                price_at_order: item.price_at_order,
            });
        }
        let order = Order {
            id,
            customer_id: data.customer_id,
            status: OrderStatus::Pending,
            total_price: data.total_price,
            delivery_address: data.delivery_address.clone(),
            items,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.work.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn order_for_update(&mut self, id: i64) -> StoreResult<Option<Order>> {
        Ok(self.work.live_order(id).cloned())
    }

    async fn set_order_status(
        &mut self,
        id: i64,
        status: OrderStatus,
        now: i64,
    ) -> StoreResult<()> {
        if let Some(order) = self.work.orders.get_mut(&id) {
            order.status = status;
            order.updated_at = now;
        }
        Ok(())
    }

    async fn record_transition(
        &mut self,
        order_id: i64,
        from: Option<OrderStatus>,
        to: OrderStatus,
        source: TransitionSource,
        now: i64,
    ) -> StoreResult<()> {
        let id = self.work.next_id();
        self.work.transitions.push(OrderTransition {
            id,
            order_id,
            from_status: from,
            to_status: to,
            source,
            created_at: now,
        });
        Ok(())
    }

    async fn soft_delete_order(&mut self, id: i64, now: i64) -> StoreResult<()> {
        if let Some(order) = self.work.orders.get_mut(&id) {
            order.deleted_at = Some(now);
        }
        Ok(())
    }

    async fn payment_for_update(&mut self, order_id: i64) -> StoreResult<Option<Payment>> {
        Ok(self.work.payment_of(order_id).cloned())
    }

    async fn insert_payment(
        &mut self,
        data: &NewPayment,
        now: i64,
    ) -> StoreResult<Option<Payment>> {
        if self.work.payment_of(data.order_id).is_some() {
            return Ok(None);
        }
        let id = self.work.next_id();
        let payment = Payment {
            id,
            order_id: data.order_id,
            amount: data.amount,
            status: PaymentStatus::Pending,
            payment_token: data.payment_token.clone(),
            payment_url: data.payment_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.work.payments.insert(id, payment.clone());
        Ok(Some(payment))
    }

    async fn set_payment_status(
        &mut self,
        order_id: i64,
        status: PaymentStatus,
        now: i64,
    ) -> StoreResult<()> {
        if let Some(payment) = self.work.payment_of_mut(order_id) {
            payment.status = status;
            payment.updated_at = now;
        }
        Ok(())
    }

    async fn set_payment_checkout(
        &mut self,
        order_id: i64,
        payment_token: &str,
        payment_url: &str,
        now: i64,
    ) -> StoreResult<()> {
        if let Some(payment) = self.work.payment_of_mut(order_id) {
            payment.payment_token = payment_token.to_string();
            payment.payment_url = payment_url.to_string();
            payment.updated_at = now;
        }
        Ok(())
    }

    async fn table_for_update(&mut self, id: i64) -> StoreResult<Option<DiningTable>> {
        Ok(self.work.live_table(id).cloned())
    }

    async fn has_active_reservation(
        &mut self,
        table_id: i64,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        exclude: Option<i64>,
    ) -> StoreResult<bool> {
        Ok(self.work.reservations.values().any(|r| {
            r.deleted_at.is_none()
                && r.table_id == Some(table_id)
                && Some(r.id) != exclude
                && r.status.is_active()
                && r.reserve_date >= from
                && r.reserve_date < until
        }))
    }

    async fn insert_reservation(
        &mut self,
        data: &NewReservation,
        now: i64,
    ) -> StoreResult<Reservation> {
        let id = self.work.next_id();
        let reservation = Reservation {
            id,
            customer_id: data.customer_id,
            table_id: Some(data.table_id),
            table_number: data.table_number,
            guest_count: data.guest_count,
            reserve_date: data.reserve_date,
            status: ReservationStatus::Pending,
            special_notes: data.special_notes.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.work.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn reservation_for_update(&mut self, id: i64) -> StoreResult<Option<Reservation>> {
        Ok(self.work.live_reservation(id).cloned())
    }

    async fn update_reservation(
        &mut self,
        reservation: &Reservation,
        now: i64,
    ) -> StoreResult<Reservation> {
        let mut updated = reservation.clone();
        updated.updated_at = now;
        self.work.reservations.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn soft_delete_reservation(&mut self, id: i64, now: i64) -> StoreResult<()> {
        if let Some(r) = self.work.reservations.get_mut(&id) {
            r.deleted_at = Some(now);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTx { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::NewOrderItem;

    fn menu(title: &str, price: i64) -> MenuCreate {
        MenuCreate {
            title: title.into(),
            description: None,
            price: Decimal::from(price),
            quantity: 10,
            category: Some("bread".into()),
            rating: 4.0,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_dropped_tx_rolls_back() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            let order = NewOrder {
                customer_id: 1,
                total_price: Decimal::from(10),
                delivery_address: "A".into(),
                items: vec![NewOrderItem {
                    menu_id: 1,
                    quantity: 1,
                    price_at_order: Decimal::from(10),
                }],
            };
            tx.insert_order(&order, 0).await.unwrap();
        }
        let page = Page { limit: 10, offset: 0 };
        let (orders, total) = store.list_orders(None, page).await.unwrap();
        assert!(orders.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_committed_tx_is_visible() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let order = NewOrder {
            customer_id: 1,
            total_price: Decimal::from(10),
            delivery_address: "A".into(),
            items: vec![],
        };
        let created = tx.insert_order(&order, 0).await.unwrap();
        tx.commit().await.unwrap();
        assert!(store.order_by_id(created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_soft_deleted_menu_is_invisible() {
        let store = MemoryStore::new();
        let m = store.insert_menu(&menu("Rye", 20), 0).await.unwrap();
        assert!(store.soft_delete_menu(m.id, 1).await.unwrap());
        assert!(store.menu_by_id(m.id).await.unwrap().is_none());

        let page = Page { limit: 10, offset: 0 };
        let (rows, total) = store.list_menus(&MenuFilter::default(), page).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
        assert!(!store.soft_delete_menu(m.id, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_menu_search_and_paging() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.insert_menu(&menu(&format!("Sourdough {i}"), 10), 0).await.unwrap();
        }
        store.insert_menu(&menu("Croissant", 10), 0).await.unwrap();

        let filter = MenuFilter {
            category: None,
            search: Some("sourDOUGH".into()),
        };
        let (rows, total) = store
            .list_menus(&filter, Page { limit: 2, offset: 2 })
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Sourdough 2");
    }

    #[tokio::test]
    async fn test_duplicate_table_number_rejected() {
        let store = MemoryStore::new();
        let data = DiningTableCreate {
            table_number: 5,
            capacity: 4,
            is_available: None,
        };
        let first = store.insert_table(&data, 0).await.unwrap();
        assert!(matches!(
            store.insert_table(&data, 0).await,
            Err(StoreError::UniqueViolation(_))
        ));
        // number is reusable once the holder is soft-deleted
        store.soft_delete_table(first.id, 1).await.unwrap();
        assert!(store.insert_table(&data, 2).await.is_ok());
    }
}
