use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

use crate::api::response::success;
use crate::error::ApiError;
use crate::services::orders::UpdateOrder;
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", put(update_order))
}

async fn list_orders(Extension(services): Extension<Arc<Services>>) -> Result<Response, ApiError> {
    let orders = services.orders.find_all().await?;
    Ok(success(orders))
}

async fn update_order(
    Extension(services): Extension<Arc<Services>>,
    Path(order_id): Path<i32>,
    Json(payload): Json<UpdateOrder>,
) -> Result<Response, ApiError> {
    let order = services.orders.update(order_id, payload).await?;
    Ok(success(order))
}
