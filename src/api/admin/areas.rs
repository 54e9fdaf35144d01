use axum::{extract::Extension, response::Response, routing::post, Json, Router};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::created;
use crate::error::ApiError;
use crate::services::areas::{NewCity, NewProvince};
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/provinces", post(create_province))
        .route("/cities", post(create_city))
}

async fn create_province(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<NewProvince>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let province = services.areas.create_province(payload).await?;
    Ok(created(province))
}

async fn create_city(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<NewCity>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let city = services.areas.create_city(payload).await?;
    Ok(created(city))
}
