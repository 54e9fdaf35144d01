use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::{created, success};
use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::services::orders::ContactInfo;
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/users/orders", get(list_orders).post(create_order))
        .route("/users/orders/:id/payment", get(payment_link))
}

async fn list_orders(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let orders = services.orders.find_by_user(claims.account_id).await?;
    Ok(success(orders))
}

async fn create_order(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ContactInfo>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let order = services
        .orders
        .create_order(claims.account_id, payload)
        .await?;
    Ok(created(order))
}

async fn payment_link(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<i32>,
) -> Result<Response, ApiError> {
    let link = services
        .orders
        .payment_link(claims.account_id, order_id)
        .await?;
    Ok(success(serde_json::json!({ "payment_link": link })))
}
