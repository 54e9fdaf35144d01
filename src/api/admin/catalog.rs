use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::{created, message, success};
use crate::error::ApiError;
use crate::services::products::{NewCategory, NewProduct, UpdateProduct};
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route(
            "/products/:id",
            axum::routing::put(update_product).delete(delete_product),
        )
        .route("/categories", post(create_category))
        .route("/reviews", get(list_reviews))
        .route("/reviews/:id", axum::routing::delete(delete_review))
}

async fn create_product(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<NewProduct>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let product = services.products.create(payload).await?;
    Ok(created(product))
}

async fn update_product(
    Extension(services): Extension<Arc<Services>>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let product = services.products.update(product_id, payload).await?;
    Ok(success(product))
}

async fn delete_product(
    Extension(services): Extension<Arc<Services>>,
    Path(product_id): Path<i32>,
) -> Result<Response, ApiError> {
    services.products.delete(product_id).await?;
    Ok(message("product deleted"))
}

async fn create_category(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<NewCategory>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let category = services.products.create_category(payload).await?;
    Ok(created(category))
}

async fn list_reviews(Extension(services): Extension<Arc<Services>>) -> Result<Response, ApiError> {
    let reviews = services.products.list_all_reviews().await?;
    Ok(success(reviews))
}

async fn delete_review(
    Extension(services): Extension<Arc<Services>>,
    Path(review_id): Path<i32>,
) -> Result<Response, ApiError> {
    services.products.delete_review(review_id).await?;
    Ok(message("review deleted"))
}
