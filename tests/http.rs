mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use rust_warung::api::create_api_router;
use rust_warung::entities::user::Role;
use rust_warung::middleware::auth::generate_token;
use rust_warung::services::products::{NewCategory, NewReview};

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn store_product_routes_are_gated_on_the_store_role() {
    let (_db, services) = common::setup().await;
    let app = create_api_router(services, common::TEST_SECRET);

    let payload = json!({
        "name": "bagel",
        "description": "",
        "price": 10.0,
        "category_id": 1
    });

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/store/products",
            None,
            payload.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A user token is authenticated but carries the wrong role.
    let user_token = generate_token(common::TEST_SECRET, 1, Role::User).unwrap();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/store/products",
            Some(&user_token),
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn store_manages_the_catalog_over_http() {
    let (_db, services) = common::setup().await;
    let category = services
        .products
        .create_category(NewCategory {
            name: "snacks".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();
    let app = create_api_router(services, common::TEST_SECRET);
    let token = generate_token(common::TEST_SECRET, 1, Role::Store).unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/store/products",
            Some(&token),
            json!({
                "name": "bagel",
                "description": "baked fresh",
                "price": 10.0,
                "category_id": category.id
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let product_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/store/products", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/store/products/{product_id}"),
            Some(&token),
            json!({ "price": 12.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["price"].as_f64().unwrap(), 12.0);

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/store/products/{product_id}/reviews"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/store/products/{product_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_lists_users_and_moderates_reviews() {
    let (db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;
    let review = services
        .products
        .create_review(
            user_id,
            ids[0],
            NewReview {
                rating: 1,
                comment: "stale".to_owned(),
            },
        )
        .await
        .unwrap();

    let app = create_api_router(services, common::TEST_SECRET);
    let token = generate_token(common::TEST_SECRET, 99, Role::Admin).unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/admin/users", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["username"], "alice");

    let response = app
        .clone()
        .oneshot(get_request("/api/admin/reviews", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let delete = |id: i32| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/admin/reviews/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    };
    let response = app.clone().oneshot(delete(review.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(delete(review.id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
