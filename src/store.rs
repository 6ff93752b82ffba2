//! All SQL lives here. The `Store` owns the connection pool and is handed to
//! the HTTP layer through `web::Data`; handlers never touch Diesel directly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{
    Customer, MenuItem, NewCustomer, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus,
};
use crate::pricing;
use crate::reporting::{OrderSnapshot, SoldItem};
use crate::schema::{customers, menu_items, order_items, orders};

// ── Inputs / outputs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderInput {
    pub customer: CustomerInput,
    pub items: Vec<OrderItemInput>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub delivery_notes: Option<String>,
}

/// An order joined with its customer and its items' menu snapshots.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub customer: Customer,
    pub items: Vec<(OrderItem, MenuItem)>,
}

// ── Store ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn menu_items(&self) -> Result<Vec<MenuItem>, AppError> {
        let mut conn = self.pool.get()?;
        Ok(menu_items::table
            .select(MenuItem::as_select())
            .order(menu_items::name.asc())
            .load(&mut conn)?)
    }

    pub fn menu_items_by_category(&self, category: &str) -> Result<Vec<MenuItem>, AppError> {
        let mut conn = self.pool.get()?;
        Ok(menu_items::table
            .filter(menu_items::category.eq(category))
            .select(MenuItem::as_select())
            .order(menu_items::name.asc())
            .load(&mut conn)?)
    }

    /// Places an order: resolve every referenced menu item up front, compute
    /// totals from the snapshotted prices, then insert customer, order and
    /// items in one transaction. Any unknown item id aborts before the first
    /// write, so a failed placement leaves no partial rows behind.
    pub fn place_order(&self, input: PlaceOrderInput) -> Result<OrderDetails, AppError> {
        if input.items.is_empty() {
            return Err(AppError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(bad) = input.items.iter().find(|i| i.quantity < 1) {
            return Err(AppError::Validation(format!(
                "quantity must be positive for menu item {}",
                bad.menu_item_id
            )));
        }

        let mut conn = self.pool.get()?;

        let ids: Vec<Uuid> = input.items.iter().map(|i| i.menu_item_id).collect();
        let catalog: HashMap<Uuid, MenuItem> = menu_items::table
            .filter(menu_items::id.eq_any(&ids))
            .select(MenuItem::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        for id in &ids {
            if !catalog.contains_key(id) {
                return Err(AppError::UnknownMenuItem(*id));
            }
        }

        let lines: Vec<(bigdecimal::BigDecimal, i32)> = input
            .items
            .iter()
            .map(|i| (catalog[&i.menu_item_id].price.clone(), i.quantity))
            .collect();
        let totals = pricing::order_totals(&lines);

        conn.transaction::<_, AppError, _>(|conn| {
            let customer_id = Uuid::new_v4();
            diesel::insert_into(customers::table)
                .values(&NewCustomer {
                    id: customer_id,
                    name: input.customer.name.clone(),
                    email: input.customer.email.clone(),
                    phone: input.customer.phone.clone(),
                    address: input.customer.address.clone(),
                    city: input.customer.city.clone(),
                    postal_code: input.customer.postal_code.clone(),
                })
                .execute(conn)?;

            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrder {
                    id: order_id,
                    customer_id,
                    scheduled_date: input.scheduled_date,
                    delivery_notes: input.delivery_notes.clone(),
                    subtotal: totals.subtotal.clone(),
                    tax: totals.tax.clone(),
                    delivery_fee: totals.delivery_fee.clone(),
                    total: totals.total.clone(),
                    status: OrderStatus::Pending.as_str().to_string(),
                })
                .execute(conn)?;

            let new_items: Vec<NewOrderItem> = input
                .items
                .iter()
                .map(|i| NewOrderItem {
                    id: Uuid::new_v4(),
                    order_id,
                    menu_item_id: i.menu_item_id,
                    quantity: i.quantity,
                    unit_price: catalog[&i.menu_item_id].price.clone(),
                    special_instructions: i.special_instructions.clone(),
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            let order = orders::table
                .find(order_id)
                .select(Order::as_select())
                .first(conn)?;
            let customer = customers::table
                .find(customer_id)
                .select(Customer::as_select())
                .first(conn)?;
            let items = order_items::table
                .inner_join(menu_items::table)
                .filter(order_items::order_id.eq(order_id))
                .select((OrderItem::as_select(), MenuItem::as_select()))
                .load(conn)?;

            Ok(OrderDetails {
                order,
                customer,
                items,
            })
        })
    }

    pub fn order_details(&self, id: Uuid) -> Result<Option<OrderDetails>, AppError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(Order::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(order) = order else {
            return Ok(None);
        };

        let customer = customers::table
            .find(order.customer_id)
            .select(Customer::as_select())
            .first(&mut conn)?;
        let items = order_items::table
            .inner_join(menu_items::table)
            .filter(order_items::order_id.eq(order.id))
            .select((OrderItem::as_select(), MenuItem::as_select()))
            .load(&mut conn)?;

        Ok(Some(OrderDetails {
            order,
            customer,
            items,
        }))
    }

    /// Most recent orders by order date, each joined with customer and items.
    pub fn recent_orders(&self, limit: i64) -> Result<Vec<OrderDetails>, AppError> {
        let mut conn = self.pool.get()?;

        let recent: Vec<(Order, Customer)> = orders::table
            .inner_join(customers::table)
            .select((Order::as_select(), Customer::as_select()))
            .order(orders::order_date.desc())
            .limit(limit)
            .load(&mut conn)?;

        let order_ids: Vec<Uuid> = recent.iter().map(|(o, _)| o.id).collect();
        let mut items_by_order = load_items_by_order(&mut conn, &order_ids)?;

        Ok(recent
            .into_iter()
            .map(|(order, customer)| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                OrderDetails {
                    order,
                    customer,
                    items,
                }
            })
            .collect())
    }

    /// Writes a new status; last write wins, no transition checks.
    pub fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, AppError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.find(id))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .returning(Order::as_returning())
            .get_result(&mut conn)
            .optional()?;

        updated.ok_or(AppError::NotFound)
    }

    /// Orders whose order date falls inside the inclusive window, ascending
    /// by date, shaped for the reporting aggregator.
    pub fn orders_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<OrderSnapshot>, AppError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<Order> = orders::table
            .filter(orders::order_date.between(start, end))
            .select(Order::as_select())
            .order(orders::order_date.asc())
            .load(&mut conn)?;

        let order_ids: Vec<Uuid> = rows.iter().map(|o| o.id).collect();
        let mut items_by_order = load_items_by_order(&mut conn, &order_ids)?;

        Ok(rows
            .into_iter()
            .map(|order| OrderSnapshot {
                id: order.id,
                order_date: order.order_date,
                total: order.total,
                items: items_by_order
                    .remove(&order.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(item, menu_item)| SoldItem {
                        menu_item,
                        quantity: item.quantity,
                    })
                    .collect(),
            })
            .collect())
    }
}

fn load_items_by_order(
    conn: &mut PgConnection,
    order_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<(OrderItem, MenuItem)>>, AppError> {
    let rows: Vec<(OrderItem, MenuItem)> = order_items::table
        .inner_join(menu_items::table)
        .filter(order_items::order_id.eq_any(order_ids))
        .select((OrderItem::as_select(), MenuItem::as_select()))
        .load(conn)?;

    let mut by_order: HashMap<Uuid, Vec<(OrderItem, MenuItem)>> = HashMap::new();
    for (item, menu_item) in rows {
        by_order.entry(item.order_id).or_default().push((item, menu_item));
    }
    Ok(by_order)
}
