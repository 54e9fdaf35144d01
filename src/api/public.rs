use axum::{
    extract::{Extension, Path, Query},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::api::response::{created, success};
use crate::entities::user::Role;
use crate::error::ApiError;
use crate::services::users::Credentials;
use crate::services::{ProductLookup, Services};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/products/:id/reviews", get(list_reviews))
        .route("/categories", get(list_categories))
        .route("/provinces", get(list_provinces))
        .route("/cities", get(list_cities))
}

async fn register(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<Credentials>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let profile = services.users.register(payload).await?;
    Ok(created(profile))
}

async fn login(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<Credentials>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let token = services.users.login(payload, Role::User).await?;
    Ok(success(serde_json::json!({ "token": token })))
}

#[derive(Debug, Deserialize)]
struct ProductsQuery {
    category_id: Option<i32>,
}

async fn list_products(
    Extension(services): Extension<Arc<Services>>,
    Query(query): Query<ProductsQuery>,
) -> Result<Response, ApiError> {
    let products = services.products.list(query.category_id).await?;
    Ok(success(products))
}

async fn get_product(
    Extension(services): Extension<Arc<Services>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let product = services.products.find_by_id(id).await?;
    Ok(success(product))
}

async fn list_reviews(
    Extension(services): Extension<Arc<Services>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let reviews = services.products.list_reviews(id).await?;
    Ok(success(reviews))
}

async fn list_categories(
    Extension(services): Extension<Arc<Services>>,
) -> Result<Response, ApiError> {
    let categories = services.products.list_categories().await?;
    Ok(success(categories))
}

async fn list_provinces(
    Extension(services): Extension<Arc<Services>>,
) -> Result<Response, ApiError> {
    let provinces = services.areas.list_provinces().await?;
    Ok(success(provinces))
}

#[derive(Debug, Deserialize)]
struct CitiesQuery {
    province_id: Option<i32>,
}

async fn list_cities(
    Extension(services): Extension<Arc<Services>>,
    Query(query): Query<CitiesQuery>,
) -> Result<Response, ApiError> {
    let cities = services.areas.list_cities(query.province_id).await?;
    Ok(success(cities))
}
