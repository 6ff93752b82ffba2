use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::MenuItem;
use crate::store::Store;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "18.50"
    pub price: String,
    pub category: String,
    pub item_type: String,
    pub image_url: Option<String>,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(m: MenuItem) -> Self {
        MenuItemResponse {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price.to_string(),
            category: m.category,
            item_type: m.item_type,
            image_url: m.image_url,
        }
    }
}

/// GET /api/menu-items
#[utoipa::path(
    get,
    path = "/api/menu-items",
    responses(
        (status = 200, description = "All menu items", body = [MenuItemResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "menu"
)]
pub async fn list_menu_items(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let store = store.get_ref().clone();
    let items = web::block(move || store.menu_items())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<MenuItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/menu-items/category/{category}
#[utoipa::path(
    get,
    path = "/api/menu-items/category/{category}",
    params(
        ("category" = String, Path, description = "Menu item category"),
    ),
    responses(
        (status = 200, description = "Menu items in the category", body = [MenuItemResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "menu"
)]
pub async fn list_menu_items_by_category(
    store: web::Data<Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let category = path.into_inner();
    let store = store.get_ref().clone();
    let items = web::block(move || store.menu_items_by_category(&category))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<MenuItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}
