//! The reporting passes: sales metrics, item popularity, sales trend.
//!
//! Everything here is pure. The store hands over order snapshots (orders in
//! ascending date order, each with its items joined to the menu catalog) and
//! the three operations filter and fold them in memory. A category or
//! menu-item filter applies uniformly: the order set shrinks to orders
//! containing at least one qualifying item, and item aggregation counts
//! qualifying items only. Order totals of qualifying orders count whole.

use std::collections::HashMap;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::MenuItem;

use super::filter::ResolvedFilter;

/// One order as the aggregator sees it: the persisted total plus the items
/// with their resolved menu entries.
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    pub id: Uuid,
    pub order_date: DateTime<Utc>,
    pub total: BigDecimal,
    pub items: Vec<SoldItem>,
}

#[derive(Debug, Clone)]
pub struct SoldItem {
    pub menu_item: MenuItem,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesMetrics {
    pub total_revenue: BigDecimal,
    pub total_orders: i64,
    pub average_order_value: BigDecimal,
    pub top_selling_item: Option<ItemSales>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSales {
    pub menu_item: MenuItem,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub revenue: BigDecimal,
}

fn item_qualifies(item: &SoldItem, filter: &ResolvedFilter) -> bool {
    if let Some(category) = &filter.category {
        if &item.menu_item.category != category {
            return false;
        }
    }
    if let Some(menu_item_id) = filter.menu_item_id {
        if item.menu_item.id != menu_item_id {
            return false;
        }
    }
    true
}

/// Orders in the window that contain at least one qualifying item (every
/// order qualifies when no category/item filter is set).
fn select_orders<'a>(orders: &'a [OrderSnapshot], filter: &ResolvedFilter) -> Vec<&'a OrderSnapshot> {
    orders
        .iter()
        .filter(|o| filter.window.contains(o.order_date))
        .filter(|o| {
            if filter.category.is_none() && filter.menu_item_id.is_none() {
                return true;
            }
            o.items.iter().any(|i| item_qualifies(i, filter))
        })
        .collect()
}

/// Sums quantities per menu item over the selected orders, ranked descending.
///
/// Insertion order is first-seen (orders arrive date-ascending) and the sort
/// is stable, so ties resolve to the item seen first.
fn rank_items(selected: &[&OrderSnapshot], filter: &ResolvedFilter) -> Vec<ItemSales> {
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut ranked: Vec<ItemSales> = Vec::new();

    for order in selected {
        for item in order.items.iter().filter(|i| item_qualifies(i, filter)) {
            match index.get(&item.menu_item.id) {
                Some(&pos) => ranked[pos].quantity += i64::from(item.quantity),
                None => {
                    index.insert(item.menu_item.id, ranked.len());
                    ranked.push(ItemSales {
                        menu_item: item.menu_item.clone(),
                        quantity: i64::from(item.quantity),
                    });
                }
            }
        }
    }

    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranked
}

pub fn sales_metrics(orders: &[OrderSnapshot], filter: &ResolvedFilter) -> SalesMetrics {
    let selected = select_orders(orders, filter);

    let total_orders = selected.len() as i64;
    let total_revenue: BigDecimal = selected.iter().map(|o| o.total.clone()).sum();
    let total_revenue = total_revenue.with_scale(2);

    let average_order_value = if total_orders == 0 {
        BigDecimal::zero().with_scale(2)
    } else {
        (&total_revenue / BigDecimal::from(total_orders))
            .with_scale_round(2, RoundingMode::HalfUp)
    };

    let top_selling_item = rank_items(&selected, filter).into_iter().next();

    SalesMetrics {
        total_revenue,
        total_orders,
        average_order_value,
        top_selling_item,
    }
}

pub fn item_popularity(orders: &[OrderSnapshot], filter: &ResolvedFilter) -> Vec<ItemSales> {
    let selected = select_orders(orders, filter);
    rank_items(&selected, filter)
}

/// Revenue grouped by UTC calendar day, ascending.
pub fn sales_trend(orders: &[OrderSnapshot], filter: &ResolvedFilter) -> Vec<TrendPoint> {
    let selected = select_orders(orders, filter);

    let mut by_day: std::collections::BTreeMap<NaiveDate, BigDecimal> =
        std::collections::BTreeMap::new();
    for order in &selected {
        let day = order.order_date.date_naive();
        let revenue = by_day.entry(day).or_insert_with(BigDecimal::zero);
        *revenue += order.total.clone();
    }

    by_day
        .into_iter()
        .map(|(date, revenue)| TrendPoint {
            date,
            revenue: revenue.with_scale(2),
        })
        .collect()
}
