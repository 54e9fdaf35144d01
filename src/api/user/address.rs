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
use crate::middleware::auth::Claims;
use crate::services::addresses::AddressInput;
use crate::services::Services;

pub fn router() -> Router {
    Router::new()
        .route("/users/address", get(list_addresses).post(create_address))
        .route(
            "/users/address/:id",
            axum::routing::put(update_address).delete(delete_address),
        )
}

async fn list_addresses(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let addresses = services.addresses.list(claims.account_id).await?;
    Ok(success(addresses))
}

async fn create_address(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddressInput>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let address = services.addresses.create(claims.account_id, payload).await?;
    Ok(created(address))
}

async fn update_address(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Path(address_id): Path<i32>,
    Json(payload): Json<AddressInput>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let address = services
        .addresses
        .update(claims.account_id, address_id, payload)
        .await?;
    Ok(success(address))
}

async fn delete_address(
    Extension(services): Extension<Arc<Services>>,
    Extension(claims): Extension<Claims>,
    Path(address_id): Path<i32>,
) -> Result<Response, ApiError> {
    services
        .addresses
        .delete(claims.account_id, address_id)
        .await?;
    Ok(message("address deleted"))
}
