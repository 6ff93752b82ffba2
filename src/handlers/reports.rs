use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::handlers::menu::MenuItemResponse;
use crate::reporting::{self, ItemSales, ReportFilter, ResolvedFilter, SalesMetrics, TrendPoint};
use crate::store::Store;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemSalesResponse {
    pub menu_item: MenuItemResponse,
    pub quantity: i64,
}

impl From<ItemSales> for ItemSalesResponse {
    fn from(i: ItemSales) -> Self {
        ItemSalesResponse {
            menu_item: i.menu_item.into(),
            quantity: i.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesMetricsResponse {
    pub total_revenue: String,
    pub total_orders: i64,
    pub average_order_value: String,
    pub top_selling_item: Option<ItemSalesResponse>,
}

impl From<SalesMetrics> for SalesMetricsResponse {
    fn from(m: SalesMetrics) -> Self {
        SalesMetricsResponse {
            total_revenue: m.total_revenue.to_string(),
            total_orders: m.total_orders,
            average_order_value: m.average_order_value.to_string(),
            top_selling_item: m.top_selling_item.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrendPointResponse {
    /// Calendar date, `YYYY-MM-DD`, UTC.
    pub date: String,
    pub revenue: String,
}

impl From<TrendPoint> for TrendPointResponse {
    fn from(p: TrendPoint) -> Self {
        TrendPointResponse {
            date: p.date.to_string(),
            revenue: p.revenue.to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn load_window(
    store: &web::Data<Store>,
    filter: &ReportFilter,
) -> Result<(Vec<reporting::OrderSnapshot>, ResolvedFilter), AppError> {
    let resolved = filter.resolve(Utc::now())?;
    let store = store.get_ref().clone();
    let window = resolved.window;

    let orders = web::block(move || store.orders_in_window(window.start, window.end))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok((orders, resolved))
}

/// POST /api/reports/sales-metrics
#[utoipa::path(
    post,
    path = "/api/reports/sales-metrics",
    request_body = ReportFilter,
    responses(
        (status = 200, description = "Sales metrics over the resolved window", body = SalesMetricsResponse),
        (status = 400, description = "Invalid filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "reports"
)]
pub async fn sales_metrics(
    store: web::Data<Store>,
    body: web::Json<ReportFilter>,
) -> Result<HttpResponse, AppError> {
    let (orders, resolved) = load_window(&store, &body).await?;
    let metrics = reporting::sales_metrics(&orders, &resolved);
    Ok(HttpResponse::Ok().json(SalesMetricsResponse::from(metrics)))
}

/// POST /api/reports/item-popularity
#[utoipa::path(
    post,
    path = "/api/reports/item-popularity",
    request_body = ReportFilter,
    responses(
        (status = 200, description = "Items ranked by quantity sold, descending", body = [ItemSalesResponse]),
        (status = 400, description = "Invalid filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "reports"
)]
pub async fn item_popularity(
    store: web::Data<Store>,
    body: web::Json<ReportFilter>,
) -> Result<HttpResponse, AppError> {
    let (orders, resolved) = load_window(&store, &body).await?;
    let ranked: Vec<ItemSalesResponse> = reporting::item_popularity(&orders, &resolved)
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(HttpResponse::Ok().json(ranked))
}

/// POST /api/reports/sales-trend
#[utoipa::path(
    post,
    path = "/api/reports/sales-trend",
    request_body = ReportFilter,
    responses(
        (status = 200, description = "Per-day revenue, ascending by date", body = [TrendPointResponse]),
        (status = 400, description = "Invalid filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "reports"
)]
pub async fn sales_trend(
    store: web::Data<Store>,
    body: web::Json<ReportFilter>,
) -> Result<HttpResponse, AppError> {
    let (orders, resolved) = load_window(&store, &body).await?;
    let trend: Vec<TrendPointResponse> = reporting::sales_trend(&orders, &resolved)
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(HttpResponse::Ok().json(trend))
}
