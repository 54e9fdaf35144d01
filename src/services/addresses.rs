use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::entities::{address, city, province};
use crate::error::ApiError;
use crate::services::AreaLookup;

#[derive(Debug, Deserialize, Validate)]
pub struct AddressInput {
    #[validate(length(min = 3, max = 255))]
    pub full_name: String,
    #[validate(length(min = 8, max = 20))]
    pub phone_number: String,
    pub province_id: i32,
    pub city_id: i32,
    #[validate(length(min = 1))]
    pub street: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Address with its area records attached. A dangling province or city
/// reference on read is a hard error, never defaulted away.
#[derive(Debug, Serialize)]
pub struct AddressView {
    pub id: i32,
    pub full_name: String,
    pub phone_number: String,
    pub province: province::Model,
    pub city: city::Model,
    pub street: String,
    pub is_primary: bool,
}

pub struct AddressService {
    db: DatabaseConnection,
    areas: Arc<dyn AreaLookup>,
}

impl AddressService {
    pub fn new(db: DatabaseConnection, areas: Arc<dyn AreaLookup>) -> Self {
        Self { db, areas }
    }

    pub async fn list(&self, user_id: i32) -> Result<Vec<AddressView>, ApiError> {
        let rows = address::Entity::find()
            .filter(address::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.attach_area(row).await?);
        }
        Ok(views)
    }

    /// The province/city pair is validated before the row is written;
    /// it is not re-validated afterwards.
    pub async fn create(&self, user_id: i32, input: AddressInput) -> Result<AddressView, ApiError> {
        self.areas
            .validate_location(input.province_id, input.city_id)
            .await?;

        let row = address::ActiveModel {
            user_id: Set(user_id),
            full_name: Set(input.full_name),
            phone_number: Set(input.phone_number),
            province_id: Set(input.province_id),
            city_id: Set(input.city_id),
            street: Set(input.street),
            is_primary: Set(input.is_primary),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.attach_area(row).await
    }

    pub async fn update(
        &self,
        user_id: i32,
        address_id: i32,
        input: AddressInput,
    ) -> Result<AddressView, ApiError> {
        let row = address::Entity::find_by_id(address_id)
            .filter(address::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("address"))?;

        self.areas
            .validate_location(input.province_id, input.city_id)
            .await?;

        let mut active: address::ActiveModel = row.into();
        active.full_name = Set(input.full_name);
        active.phone_number = Set(input.phone_number);
        active.province_id = Set(input.province_id);
        active.city_id = Set(input.city_id);
        active.street = Set(input.street);
        active.is_primary = Set(input.is_primary);

        let row = active.update(&self.db).await?;
        self.attach_area(row).await
    }

    pub async fn delete(&self, user_id: i32, address_id: i32) -> Result<(), ApiError> {
        let row = address::Entity::find_by_id(address_id)
            .filter(address::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("address"))?;

        let active: address::ActiveModel = row.into();
        active.delete(&self.db).await?;
        Ok(())
    }

    async fn attach_area(&self, row: address::Model) -> Result<AddressView, ApiError> {
        let province = self.areas.find_province(row.province_id).await?;
        let city = self.areas.find_city(row.city_id).await?;

        Ok(AddressView {
            id: row.id,
            full_name: row.full_name,
            phone_number: row.phone_number,
            province,
            city,
            street: row.street,
            is_primary: row.is_primary,
        })
    }
}
