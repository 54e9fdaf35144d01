use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::user::Role;
use crate::error::ApiError;

/// Identifier attached to the request once the bearer token checks out.
/// Handlers trust this; `account_id` means a user, admin or store id
/// depending on `role`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub account_id: i32,
    pub role: String,
    pub exp: usize,
}

#[derive(Clone, Debug)]
pub struct AuthState {
    pub secret: String,
    pub role: Role,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?,
        None => return Err(ApiError::Unauthorized),
    };

    let claims = validate_token(&state.secret, token)?;

    let role = Role::from_str(&claims.role).map_err(|_| ApiError::Unauthorized)?;
    if role != state.role {
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn generate_token(secret: &str, account_id: i32, role: Role) -> Result<String, ApiError> {
    let exp = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| ApiError::Internal("token expiry overflow".to_owned()))?
        .timestamp() as usize;

    let claims = Claims {
        account_id,
        role: role.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| ApiError::Internal(err.to_string()))
}

pub fn validate_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized)?;

    Ok(token_data.claims)
}
