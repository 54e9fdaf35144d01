pub mod address;
pub mod cart;
pub mod orders;
pub mod profile;

use axum::{middleware, Router};

use crate::middleware::auth::{auth_middleware, AuthState};

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .merge(cart::router())
        .merge(orders::router())
        .merge(address::router())
        .merge(profile::router())
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
}
