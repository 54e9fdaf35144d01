mod common;

use rust_warung::error::ApiError;
use rust_warung::services::products::{NewCategory, NewProduct, NewReview};
use rust_warung::services::ProductLookup;

fn new_product(name: &str, price: f64, category_id: i32) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        description: "baked fresh".to_owned(),
        price,
        category_id,
        images: vec![],
    }
}

#[tokio::test]
async fn product_requires_an_existing_category() {
    let (_db, services) = common::setup().await;

    let err = services
        .products
        .create(new_product("bagel", 10.0, 999))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("category")));
}

#[tokio::test]
async fn duplicate_product_name_is_a_conflict() {
    let (_db, services) = common::setup().await;
    let category = services
        .products
        .create_category(NewCategory {
            name: "snacks".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();

    services
        .products
        .create(new_product("bagel", 10.0, category.id))
        .await
        .unwrap();
    let err = services
        .products
        .create(new_product("bagel", 12.0, category.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn details_carry_category_images_and_mean_rating() {
    let (_db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let category = services
        .products
        .create_category(NewCategory {
            name: "snacks".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();

    let mut input = new_product("bagel", 10.0, category.id);
    input.images = vec!["https://cdn.example/bagel.jpg".to_owned()];
    let created = services.products.create(input).await.unwrap();

    // No reviews yet: the rating is 0, not an error.
    assert_eq!(created.rating, 0.0);
    assert_eq!(created.category.name, "snacks");
    assert_eq!(created.images.len(), 1);

    for rating in [4, 5] {
        services
            .products
            .create_review(
                user_id,
                created.id,
                NewReview {
                    rating,
                    comment: String::new(),
                },
            )
            .await
            .unwrap();
    }

    let details = services.products.find_by_id(created.id).await.unwrap();
    assert_eq!(details.rating, 4.5);
    assert_eq!(
        services
            .products
            .list_reviews(created.id)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn moderating_a_review_updates_the_derived_rating() {
    let (_db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;
    let category = services
        .products
        .create_category(NewCategory {
            name: "snacks".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();
    let created = services
        .products
        .create(new_product("bagel", 10.0, category.id))
        .await
        .unwrap();

    let mut review_ids = Vec::new();
    for rating in [4, 2] {
        let review = services
            .products
            .create_review(
                user_id,
                created.id,
                NewReview {
                    rating,
                    comment: String::new(),
                },
            )
            .await
            .unwrap();
        review_ids.push(review.id);
    }
    assert_eq!(
        services.products.find_by_id(created.id).await.unwrap().rating,
        3.0
    );
    assert_eq!(services.products.list_all_reviews().await.unwrap().len(), 2);

    services.products.delete_review(review_ids[1]).await.unwrap();
    assert_eq!(
        services.products.find_by_id(created.id).await.unwrap().rating,
        4.0
    );

    let err = services
        .products
        .delete_review(review_ids[1])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("review")));
}

#[tokio::test]
async fn listing_filters_by_category() {
    let (_db, services) = common::setup().await;
    let snacks = services
        .products
        .create_category(NewCategory {
            name: "snacks".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();
    let drinks = services
        .products
        .create_category(NewCategory {
            name: "drinks".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();

    services
        .products
        .create(new_product("bagel", 10.0, snacks.id))
        .await
        .unwrap();
    services
        .products
        .create(new_product("kopi", 3.0, drinks.id))
        .await
        .unwrap();

    assert_eq!(services.products.list(None).await.unwrap().len(), 2);
    let filtered = services.products.list(Some(drinks.id)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "kopi");
}

#[tokio::test]
async fn reviewing_an_unknown_product_fails() {
    let (_db, services) = common::setup().await;
    let user_id = common::register_user(&services, "alice").await;

    let err = services
        .products
        .create_review(
            user_id,
            999,
            NewReview {
                rating: 5,
                comment: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("product")));
}

#[tokio::test]
async fn delete_removes_the_product() {
    let (_db, services) = common::setup().await;
    let category = services
        .products
        .create_category(NewCategory {
            name: "snacks".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap();
    let created = services
        .products
        .create(new_product("bagel", 10.0, category.id))
        .await
        .unwrap();

    services.products.delete(created.id).await.unwrap();
    let err = services.products.find_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("product")));
}
