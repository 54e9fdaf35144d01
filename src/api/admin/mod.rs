pub mod accounts;
pub mod areas;
pub mod catalog;
pub mod orders;

use axum::{extract::Extension, middleware, response::Response, routing::post, Json, Router};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::success;
use crate::entities::user::Role;
use crate::error::ApiError;
use crate::middleware::auth::{auth_middleware, AuthState};
use crate::services::users::Credentials;
use crate::services::Services;

pub fn router(auth: AuthState) -> Router {
    let protected = Router::new()
        .merge(orders::router())
        .merge(catalog::router())
        .merge(areas::router())
        .merge(accounts::router())
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new().route("/login", post(login)).merge(protected)
}

async fn login(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<Credentials>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let token = services.users.login(payload, Role::Admin).await?;
    Ok(success(serde_json::json!({ "token": token })))
}
