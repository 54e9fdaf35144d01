use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::{created, success};
use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::services::products::NewReview;
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/users/products/:id/reviews", post(create_review))
}

async fn get_profile(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let profile = services.users.profile(claims.account_id).await?;
    Ok(success(profile))
}

async fn create_review(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Path(product_id): Path<i32>,
    Json(payload): Json<NewReview>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let review = services
        .products
        .create_review(claims.account_id, product_id, payload)
        .await?;
    Ok(created(review))
}
