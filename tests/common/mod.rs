use sea_orm::{ConnectOptions, Database, DatabaseConnection, Set};
use std::sync::Arc;

use rust_warung::entities::{category, product, setup_schema};
use rust_warung::services::users::Credentials;
use rust_warung::services::{build_services, Services};

pub const TEST_SECRET: &str = "test-secret";

pub async fn setup() -> (DatabaseConnection, Arc<Services>) {
    // Every pooled connection to an in-memory sqlite sees its own
    // database; a single connection keeps the schema visible everywhere.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("failed to open in-memory database");
    setup_schema(&db).await.expect("failed to create schema");
    let services = build_services(db.clone(), TEST_SECRET);
    (db, services)
}

pub async fn register_user(services: &Services, username: &str) -> i32 {
    services
        .users
        .register(Credentials {
            username: username.to_owned(),
            password: "correct-horse".to_owned(),
        })
        .await
        .expect("failed to register user")
        .id
}

/// Seeds one category and returns the ids of products created with the
/// given (name, price) pairs.
pub async fn seed_products(db: &DatabaseConnection, prices: &[(&str, f64)]) -> Vec<i32> {
    use sea_orm::ActiveModelTrait;

    let category = category::ActiveModel {
        name: Set("snacks".to_owned()),
        description: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to seed category");

    let mut ids = Vec::with_capacity(prices.len());
    for (name, price) in prices {
        let model = product::ActiveModel {
            name: Set((*name).to_owned()),
            description: Set(String::new()),
            price: Set(*price),
            category_id: Set(category.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("failed to seed product");
        ids.push(model.id);
    }
    ids
}
