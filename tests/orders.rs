mod common;

use sea_orm::{ConnectionTrait, EntityTrait};

use rust_warung::entities::order::Status;
use rust_warung::entities::{order, order_item};
use rust_warung::error::ApiError;
use rust_warung::services::orders::{ContactInfo, UpdateOrder};
use rust_warung::services::products::UpdateProduct;

fn contact() -> ContactInfo {
    ContactInfo {
        full_name: "Alice Example".to_owned(),
        phone_number: "081234567890".to_owned(),
        address: "Jl. Kenanga 1".to_owned(),
    }
}

#[tokio::test]
async fn empty_cart_fails_without_side_effects() {
    let (db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;

    // The cart exists but holds nothing.
    services.carts.add_item(user_id, ids[0], 1).await.unwrap();
    services.carts.clear(user_id).await.unwrap();

    let err = services
        .orders
        .create_order(user_id, contact())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyCart));

    assert!(order::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(order_item::Entity::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn account_without_cart_history_cannot_order() {
    let (_db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;

    // No cart was ever created, so the cart read fails before the
    // empty-cart check applies.
    let err = services
        .orders
        .create_order(user_id, contact())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("cart")));
}

#[tokio::test]
async fn failed_snapshot_rolls_back_order_and_keeps_cart() {
    let (db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;
    services.carts.add_item(user_id, ids[0], 2).await.unwrap();

    // Sabotage the snapshot target so the item insert fails after the
    // order row was written inside the transaction.
    db.execute_unprepared("DROP TABLE order_items").await.unwrap();

    let err = services
        .orders
        .create_order(user_id, contact())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Db(_)));

    assert!(order::Entity::find().all(&db).await.unwrap().is_empty());
    let cart = services.carts.find_cart(user_id).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
}

#[tokio::test]
async fn order_snapshots_cart_and_clears_it() {
    let (db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0), ("pretzel", 5.0)]).await;

    services.carts.add_item(user_id, ids[0], 2).await.unwrap();
    services.carts.add_item(user_id, ids[1], 1).await.unwrap();
    assert_eq!(
        services.carts.find_cart(user_id).await.unwrap().total_price,
        25.0
    );

    services.carts.add_item(user_id, ids[0], 3).await.unwrap();
    assert_eq!(
        services.carts.find_cart(user_id).await.unwrap().total_price,
        55.0
    );

    let order = services.orders.create_order(user_id, contact()).await.unwrap();
    assert_eq!(order.status, Status::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_price, 55.0);

    let by_product: Vec<(i32, i32)> = order
        .items
        .iter()
        .map(|item| (item.product_id, item.quantity))
        .collect();
    assert!(by_product.contains(&(ids[0], 5)));
    assert!(by_product.contains(&(ids[1], 1)));

    // The originating cart is empty afterwards, not gone.
    let cart = services.carts.find_cart(user_id).await.unwrap();
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn order_total_is_immune_to_later_price_changes() {
    let (db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;

    services.carts.add_item(user_id, ids[0], 2).await.unwrap();
    let order = services.orders.create_order(user_id, contact()).await.unwrap();
    assert_eq!(order.total_price, 20.0);

    services
        .products
        .update(
            ids[0],
            UpdateProduct {
                name: None,
                description: None,
                price: Some(99.0),
                category_id: None,
            },
        )
        .await
        .unwrap();

    let orders = services.orders.find_by_user(user_id).await.unwrap();
    assert_eq!(orders[0].total_price, 20.0);
}

#[tokio::test]
async fn status_walks_the_lifecycle_and_rejects_jumps() {
    let (db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;
    services.carts.add_item(user_id, ids[0], 1).await.unwrap();
    let order = services.orders.create_order(user_id, contact()).await.unwrap();

    let update = |status: &str| UpdateOrder {
        status: status.to_owned(),
        delivered_at: None,
    };

    // pending -> shipped is a jump.
    let err = services.orders.update(order.id, update("shipped")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    services.orders.update(order.id, update("processing")).await.unwrap();
    services.orders.update(order.id, update("shipped")).await.unwrap();
    let delivered = services.orders.update(order.id, update("delivered")).await.unwrap();
    assert_eq!(delivered.status, Status::Delivered);
    assert!(delivered.delivered_at.is_some());

    // Terminal state: nothing moves anymore.
    let err = services.orders.update(order.id, update("cancelled")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn unknown_status_is_a_validation_error() {
    let (db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;
    services.carts.add_item(user_id, ids[0], 1).await.unwrap();
    let order = services.orders.create_order(user_id, contact()).await.unwrap();

    let err = services
        .orders
        .update(
            order.id,
            UpdateOrder {
                status: "teleported".to_owned(),
                delivered_at: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn payment_link_is_scoped_to_the_owner() {
    let (db, services) = common::setup().await;
    let alice = common::register_user(&services, "alice").await;
    let bob = common::register_user(&services, "bob").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;

    services.carts.add_item(alice, ids[0], 1).await.unwrap();
    let order = services.orders.create_order(alice, contact()).await.unwrap();

    let link = services.orders.payment_link(alice, order.id).await.unwrap();
    assert!(link.contains(&order.id.to_string()));

    let err = services.orders.payment_link(bob, order.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("order")));
}

#[tokio::test]
async fn admin_listing_sees_all_orders() {
    let (db, services) = common::setup().await;
    let alice = common::register_user(&services, "alice").await;
    let bob = common::register_user(&services, "bob").await;
    let ids = common::seed_products(&db, &[("bagel", 10.0)]).await;

    services.carts.add_item(alice, ids[0], 1).await.unwrap();
    services.orders.create_order(alice, contact()).await.unwrap();
    services.carts.add_item(bob, ids[0], 2).await.unwrap();
    services.orders.create_order(bob, contact()).await.unwrap();

    assert_eq!(services.orders.find_all().await.unwrap().len(), 2);
    assert_eq!(services.orders.find_by_user(alice).await.unwrap().len(), 1);
}
