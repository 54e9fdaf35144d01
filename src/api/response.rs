use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

// Success envelope: {"data": ..., "message": ...}. Failures are shaped
// by ApiError::into_response.

pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "data": data, "message": "success" })),
    )
        .into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "data": data, "message": "created" })),
    )
        .into_response()
}

pub fn message(text: &str) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "data": null, "message": text })),
    )
        .into_response()
}
