use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::entities::user::Role;
use crate::entities::{store, user};
use crate::error::ApiError;
use crate::middleware::auth::generate_token;
use crate::services::users::{create_account, Credentials};
use crate::services::AreaLookup;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStore {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 3, max = 255))]
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct ShipmentOrigin {
    pub province_id: i32,
    pub city_id: i32,
}

pub struct StoreService {
    db: DatabaseConnection,
    areas: Arc<dyn AreaLookup>,
    jwt_secret: String,
}

impl StoreService {
    pub fn new(db: DatabaseConnection, areas: Arc<dyn AreaLookup>, jwt_secret: String) -> Self {
        Self {
            db,
            areas,
            jwt_secret,
        }
    }

    /// Store domains are unique across tenants; a taken domain is a
    /// conflict, checked before the account is created.
    pub async fn register(&self, input: RegisterStore) -> Result<store::Model, ApiError> {
        let existing = store::Entity::find()
            .filter(store::Column::Domain.eq(&input.domain))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!(
                "store domain '{}' already exists",
                input.domain
            )));
        }

        let account = create_account(&self.db, &input.username, &input.password, Role::Store).await?;

        let model = store::ActiveModel {
            user_id: Set(account.id),
            name: Set(input.name),
            domain: Set(input.domain),
            province_id: Set(None),
            city_id: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(store_id = model.id, domain = %model.domain, "store registered");
        Ok(model)
    }

    pub async fn login(&self, input: Credentials) -> Result<String, ApiError> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(&input.username))
            .filter(user::Column::Role.eq(Role::Store))
            .one(&self.db)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        model.check_hash(&input.password)?;
        generate_token(&self.jwt_secret, model.id, Role::Store)
    }

    pub async fn find_by_account(&self, account_id: i32) -> Result<store::Model, ApiError> {
        store::Entity::find()
            .filter(store::Column::UserId.eq(account_id))
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("store"))
    }

    /// Shipment origin must reference an existing province/city pair;
    /// validated through the area catalog before anything is persisted.
    pub async fn update_shipment_origin(
        &self,
        account_id: i32,
        input: ShipmentOrigin,
    ) -> Result<store::Model, ApiError> {
        self.areas
            .validate_location(input.province_id, input.city_id)
            .await?;

        let model = self.find_by_account(account_id).await?;
        let mut active: store::ActiveModel = model.into();
        active.province_id = Set(Some(input.province_id));
        active.city_id = Set(Some(input.city_id));
        Ok(active.update(&self.db).await?)
    }
}
