use axum::{
    extract::{Extension, Path},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::response::success;
use crate::error::ApiError;
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

async fn list_users(Extension(services): Extension<Arc<Services>>) -> Result<Response, ApiError> {
    let users = services.users.list().await?;
    Ok(success(users))
}

async fn get_user(
    Extension(services): Extension<Arc<Services>>,
    Path(user_id): Path<i32>,
) -> Result<Response, ApiError> {
    let profile = services.users.profile(user_id).await?;
    Ok(success(profile))
}
