use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::{created, message, success};
use crate::error::ApiError;
use crate::services::products::{NewProduct, UpdateProduct};
use crate::services::{ProductLookup, Services};

// Products are catalog-wide, not store-owned; stores manage the shared
// catalog through the same service the admin surface uses.
pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/reviews", get(list_reviews))
}

async fn list_products(
    Extension(services): Extension<Arc<Services>>,
) -> Result<Response, ApiError> {
    let products = services.products.list(None).await?;
    Ok(success(products))
}

async fn get_product(
    Extension(services): Extension<Arc<Services>>,
    Path(product_id): Path<i32>,
) -> Result<Response, ApiError> {
    let product = services.products.find_by_id(product_id).await?;
    Ok(success(product))
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

async fn list_reviews(
    Extension(services): Extension<Arc<Services>>,
    Path(product_id): Path<i32>,
) -> Result<Response, ApiError> {
    let reviews = services.products.list_reviews(product_id).await?;
    Ok(success(reviews))
}
