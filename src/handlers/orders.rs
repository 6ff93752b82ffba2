use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::store::{CustomerInput, OrderDetails, OrderItemInput, PlaceOrderInput, Store};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: CustomerRequest,
    pub order_items: Vec<OrderItemRequest>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub delivery_notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_name: String,
    pub quantity: i32,
    /// Unit price snapshotted at order time, as a decimal string.
    pub unit_price: String,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_date: String,
    pub scheduled_date: Option<String>,
    pub delivery_notes: Option<String>,
    pub subtotal: String,
    pub tax: String,
    pub delivery_fee: String,
    pub total: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsResponse {
    pub order: OrderResponse,
    pub customer: CustomerResponse,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(d: OrderDetails) -> Self {
        OrderDetailsResponse {
            order: OrderResponse {
                id: d.order.id,
                customer_id: d.order.customer_id,
                order_date: d.order.order_date.to_rfc3339(),
                scheduled_date: d.order.scheduled_date.map(|t| t.to_rfc3339()),
                delivery_notes: d.order.delivery_notes,
                subtotal: d.order.subtotal.to_string(),
                tax: d.order.tax.to_string(),
                delivery_fee: d.order.delivery_fee.to_string(),
                total: d.order.total.to_string(),
                status: d.order.status,
            },
            customer: CustomerResponse {
                id: d.customer.id,
                name: d.customer.name,
                email: d.customer.email,
                phone: d.customer.phone,
                address: d.customer.address,
                city: d.customer.city,
                postal_code: d.customer.postal_code,
            },
            items: d
                .items
                .into_iter()
                .map(|(item, menu_item)| OrderItemResponse {
                    id: item.id,
                    menu_item_id: item.menu_item_id,
                    menu_item_name: menu_item.name,
                    quantity: item.quantity,
                    unit_price: item.unit_price.to_string(),
                    special_instructions: item.special_instructions,
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Creates the customer, the order and its items as one unit. Every
/// referenced menu item is resolved before anything is written, so an
/// unknown id fails the whole request with 400 and no partial order.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderDetailsResponse),
        (status = 400, description = "Unknown menu item or invalid payload"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    store: web::Data<Store>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    validate_customer(&body.customer)?;

    let input = PlaceOrderInput {
        customer: CustomerInput {
            name: body.customer.name,
            email: body.customer.email,
            phone: body.customer.phone,
            address: body.customer.address,
            city: body.customer.city,
            postal_code: body.customer.postal_code,
        },
        items: body
            .order_items
            .into_iter()
            .map(|i| OrderItemInput {
                menu_item_id: i.menu_item_id,
                quantity: i.quantity,
                special_instructions: i.special_instructions,
            })
            .collect(),
        scheduled_date: body.scheduled_date,
        delivery_notes: body.delivery_notes,
    };

    let store = store.get_ref().clone();
    let details = web::block(move || store.place_order(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    log::info!("order {} placed, total {}", details.order.id, details.order.total);

    Ok(HttpResponse::Created().json(OrderDetailsResponse::from(details)))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderDetailsResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    store: web::Data<Store>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let store = store.get_ref().clone();

    let details = web::block(move || store.order_details(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match details {
        Some(d) => Ok(HttpResponse::Ok().json(OrderDetailsResponse::from(d))),
        None => Err(AppError::NotFound),
    }
}

/// PATCH /api/orders/{id}/status
///
/// Overwrites the status. Any value in the allowed set is accepted at any
/// time; there is no transition checking, last write wins.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Status outside the allowed set"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    store: web::Data<Store>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;
    let store = store.get_ref().clone();

    let order = web::block(move || store.update_status(order_id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse {
        id: order.id,
        customer_id: order.customer_id,
        order_date: order.order_date.to_rfc3339(),
        scheduled_date: order.scheduled_date.map(|t| t.to_rfc3339()),
        delivery_notes: order.delivery_notes,
        subtotal: order.subtotal.to_string(),
        tax: order.tax.to_string(),
        delivery_fee: order.delivery_fee.to_string(),
        total: order.total.to_string(),
        status: order.status,
    }))
}

/// GET /api/orders/recent/{limit}
#[utoipa::path(
    get,
    path = "/api/orders/recent/{limit}",
    params(
        ("limit" = i64, Path, description = "Number of orders to return (clamped to 1..=100)"),
    ),
    responses(
        (status = 200, description = "Most recent orders, newest first", body = [OrderDetailsResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn recent_orders(
    store: web::Data<Store>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let limit = path.into_inner().clamp(1, 100);
    let store = store.get_ref().clone();

    let details = web::block(move || store.recent_orders(limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderDetailsResponse> = details.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

fn validate_customer(customer: &CustomerRequest) -> Result<(), AppError> {
    let required = [
        ("name", &customer.name),
        ("email", &customer.email),
        ("phone", &customer.phone),
        ("address", &customer.address),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("customer.{} must not be empty", field)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerRequest {
        CustomerRequest {
            name: "Aiko Tanaka".to_string(),
            email: "aiko@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "12 River St".to_string(),
            city: "Portland".to_string(),
            postal_code: "97201".to_string(),
        }
    }

    #[test]
    fn well_formed_customer_passes() {
        assert!(validate_customer(&customer()).is_ok());
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut c = customer();
        c.email = "   ".to_string();
        let err = validate_customer(&c).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("customer.email"));
    }
}
