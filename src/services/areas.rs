use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use validator::Validate;

use crate::entities::{city, province};
use crate::error::ApiError;
use crate::services::AreaLookup;

#[derive(Debug, Deserialize, Validate)]
pub struct NewProvince {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCity {
    pub province_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Reference data for delivery locations. The catalog is only written
/// through the administrative create calls; bulk import from the
/// shipping-rate provider is deliberately not part of this service.
pub struct AreaService {
    db: DatabaseConnection,
}

impl AreaService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_provinces(&self) -> Result<Vec<province::Model>, ApiError> {
        Ok(province::Entity::find().all(&self.db).await?)
    }

    pub async fn list_cities(
        &self,
        province_id: Option<i32>,
    ) -> Result<Vec<city::Model>, ApiError> {
        let mut finder = city::Entity::find();
        if let Some(province_id) = province_id {
            finder = finder.filter(city::Column::ProvinceId.eq(province_id));
        }
        Ok(finder.all(&self.db).await?)
    }

    pub async fn create_province(&self, input: NewProvince) -> Result<province::Model, ApiError> {
        let existing = province::Entity::find()
            .filter(province::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!(
                "province '{}' already exists",
                input.name
            )));
        }

        Ok(province::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn create_city(&self, input: NewCity) -> Result<city::Model, ApiError> {
        province::Entity::find_by_id(input.province_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("province"))?;

        Ok(city::ActiveModel {
            province_id: Set(input.province_id),
            name: Set(input.name),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }
}

#[async_trait]
impl AreaLookup for AreaService {
    async fn find_province(&self, province_id: i32) -> Result<province::Model, ApiError> {
        province::Entity::find_by_id(province_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("province"))
    }

    async fn find_city(&self, city_id: i32) -> Result<city::Model, ApiError> {
        city::Entity::find_by_id(city_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("city"))
    }

    async fn validate_location(
        &self,
        province_id: i32,
        city_id: i32,
    ) -> Result<city::Model, ApiError> {
        city::Entity::find_by_id(city_id)
            .filter(city::Column::ProvinceId.eq(province_id))
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("location"))
    }
}
