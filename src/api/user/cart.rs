use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::{created, message, success};
use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::services::carts::{AddCartItem, UpdateCartItem};
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/cart", get(get_cart).post(add_item).delete(clear_cart))
        .route(
            "/cart/:product_id",
            delete(remove_item).put(update_item),
        )
}

async fn get_cart(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let cart = services.carts.find_cart(claims.account_id).await?;
    Ok(success(cart))
}

async fn add_item(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddCartItem>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let line = services
        .carts
        .add_item(claims.account_id, payload.product_id, payload.quantity)
        .await?;
    Ok(created(line))
}

async fn update_item(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateCartItem>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let line = services
        .carts
        .update_item(claims.account_id, product_id, payload.quantity)
        .await?;
    Ok(success(line))
}

async fn remove_item(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Path(product_id): Path<i32>,
) -> Result<Response, ApiError> {
    services
        .carts
        .remove_item(claims.account_id, product_id)
        .await?;
    Ok(message("item removed"))
}

async fn clear_cart(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    services.carts.clear(claims.account_id).await?;
    Ok(message("cart cleared"))
}
