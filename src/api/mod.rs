pub mod admin;
pub mod public;
pub mod response;
pub mod store;
pub mod user;

use axum::{extract::Extension, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::entities::user::Role;
use crate::middleware::auth::AuthState;
use crate::services::Services;

pub fn create_api_router(services: Arc<Services>, jwt_secret: &str) -> Router {
    let auth = |role| AuthState {
        secret: jwt_secret.to_owned(),
        role,
    };

    Router::new()
        .nest("/api", public::router())
        .nest("/api", user::router(auth(Role::User)))
        .nest("/api/admin", admin::router(auth(Role::Admin)))
        .nest("/api/store", store::router(auth(Role::Store)))
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
}
