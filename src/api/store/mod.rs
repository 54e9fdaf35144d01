pub mod products;

use axum::{
    extract::Extension,
    middleware,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::api::response::{created, success};
use crate::error::ApiError;
use crate::middleware::auth::{auth_middleware, AuthState, Claims};
use crate::services::stores::{RegisterStore, ShipmentOrigin};
use crate::services::users::Credentials;
use crate::services::Services;

pub fn router(auth: AuthState) -> Router {
    let protected = Router::new()
        .route("/me", get(get_store))
        .route("/shipment", put(update_shipment))
        .merge(products::router())
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

async fn register(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<RegisterStore>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let store = services.stores.register(payload).await?;
    Ok(created(store))
}

async fn login(
    Extension(services): Extension<Arc<Services>>,
    Json(payload): Json<Credentials>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let token = services.stores.login(payload).await?;
    Ok(success(serde_json::json!({ "token": token })))
}

async fn get_store(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let store = services.stores.find_by_account(claims.account_id).await?;
    Ok(success(store))
}

async fn update_shipment(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ShipmentOrigin>,
) -> Result<Response, ApiError> {
    let store = services
        .stores
        .update_shipment_origin(claims.account_id, payload)
        .await?;
    Ok(success(store))
}
