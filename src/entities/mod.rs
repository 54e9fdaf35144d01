pub mod address;
pub mod cart;
pub mod cart_item;
pub mod category;
pub mod city;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_image;
pub mod province;
pub mod review;
pub mod store;
pub mod user;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Schema, Set,
};

use crate::error::ApiError;

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(store::Entity),
        schema.create_table_from_entity(category::Entity),
        schema.create_table_from_entity(product::Entity),
        schema.create_table_from_entity(product_image::Entity),
        schema.create_table_from_entity(review::Entity),
        schema.create_table_from_entity(cart::Entity),
        schema.create_table_from_entity(cart_item::Entity),
        schema.create_table_from_entity(order::Entity),
        schema.create_table_from_entity(order_item::Entity),
        schema.create_table_from_entity(province::Entity),
        schema.create_table_from_entity(city::Entity),
        schema.create_table_from_entity(address::Entity),
    ];

    for statement in statements.iter_mut() {
        db.execute(backend.build(statement.if_not_exists())).await?;
    }

    Ok(())
}

/// Seeds the administrative account on first start so the admin surface
/// is reachable on a fresh database.
pub async fn bootstrap_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<(), ApiError> {
    let existing = user::Entity::find()
        .filter(user::Column::Role.eq(user::Role::Admin))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_string();

    let admin = user::ActiveModel {
        username: Set(username.to_owned()),
        password: Set(password_hash),
        role: Set(user::Role::Admin),
        ..Default::default()
    };
    user::Entity::insert(admin).exec(db).await?;

    tracing::info!(username, "bootstrapped admin account");
    Ok(())
}
