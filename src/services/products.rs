use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{category, product, product_image, review};
use crate::error::ApiError;
use crate::services::ProductLookup;

/// A product as served to clients: category attached, image URLs and the
/// mean review rating resolved at read time. The rating is derived, never
/// stored.
#[derive(Clone, Debug, Serialize)]
pub struct ProductDetails {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: CategoryView,
    pub rating: f64,
    pub images: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub category_id: i32,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, category_id: Option<i32>) -> Result<Vec<ProductDetails>, ApiError> {
        let mut finder = product::Entity::find();
        if let Some(category_id) = category_id {
            finder = finder.filter(product::Column::CategoryId.eq(category_id));
        }

        let models = finder.all(&self.db).await?;
        let mut details = Vec::with_capacity(models.len());
        for model in models {
            details.push(self.resolve(model).await?);
        }
        Ok(details)
    }

    pub async fn create(&self, input: NewProduct) -> Result<ProductDetails, ApiError> {
        category::Entity::find_by_id(input.category_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("category"))?;

        let existing = product::Entity::find()
            .filter(product::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!(
                "product '{}' already exists",
                input.name
            )));
        }

        let txn = self.db.begin().await?;
        let model = product::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            category_id: Set(input.category_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for url in input.images {
            product_image::ActiveModel {
                product_id: Set(model.id),
                url: Set(url),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        tracing::info!(product_id = model.id, "created product");
        self.resolve(model).await
    }

    pub async fn update(
        &self,
        product_id: i32,
        input: UpdateProduct,
    ) -> Result<ProductDetails, ApiError> {
        let model = product::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("product"))?;

        if let Some(category_id) = input.category_id {
            category::Entity::find_by_id(category_id)
                .one(&self.db)
                .await?
                .ok_or(ApiError::NotFound("category"))?;
        }

        let mut active: product::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }

        let model = active.update(&self.db).await?;
        self.resolve(model).await
    }

    pub async fn delete(&self, product_id: i32) -> Result<(), ApiError> {
        let model = product::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("product"))?;
        let active: product::ActiveModel = model.into();
        active.delete(&self.db).await?;
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<category::Model>, ApiError> {
        Ok(category::Entity::find().all(&self.db).await?)
    }

    pub async fn create_category(&self, input: NewCategory) -> Result<category::Model, ApiError> {
        let existing = category::Entity::find()
            .filter(category::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!(
                "category '{}' already exists",
                input.name
            )));
        }

        Ok(category::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn create_review(
        &self,
        user_id: i32,
        product_id: i32,
        input: NewReview,
    ) -> Result<review::Model, ApiError> {
        product::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("product"))?;

        Ok(review::ActiveModel {
            product_id: Set(product_id),
            user_id: Set(user_id),
            rating: Set(input.rating),
            comment: Set(input.comment),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn list_all_reviews(&self) -> Result<Vec<review::Model>, ApiError> {
        Ok(review::Entity::find().all(&self.db).await?)
    }

    /// Moderation: removes the review outright; the product's derived
    /// rating reflects the removal on the next read.
    pub async fn delete_review(&self, review_id: i32) -> Result<(), ApiError> {
        let model = review::Entity::find_by_id(review_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("review"))?;
        let active: review::ActiveModel = model.into();
        active.delete(&self.db).await?;
        Ok(())
    }

    pub async fn list_reviews(&self, product_id: i32) -> Result<Vec<review::Model>, ApiError> {
        product::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("product"))?;

        Ok(review::Entity::find()
            .filter(review::Column::ProductId.eq(product_id))
            .all(&self.db)
            .await?)
    }

    // A dangling category reference is a hard error, not a silent
    // default. Zero reviews is ordinary data and rates 0.0.
    async fn resolve(&self, model: product::Model) -> Result<ProductDetails, ApiError> {
        let category = category::Entity::find_by_id(model.category_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("category"))?;

        let reviews = review::Entity::find()
            .filter(review::Column::ProductId.eq(model.id))
            .all(&self.db)
            .await?;
        let rating = if reviews.is_empty() {
            0.0
        } else {
            reviews.iter().map(|r| r.rating as f64).sum::<f64>() / reviews.len() as f64
        };

        let images = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(model.id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|image| image.url)
            .collect();

        Ok(ProductDetails {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category: CategoryView {
                id: category.id,
                name: category.name,
            },
            rating,
            images,
        })
    }
}

#[async_trait]
impl ProductLookup for ProductService {
    async fn find_by_id(&self, product_id: i32) -> Result<ProductDetails, ApiError> {
        let model = product::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("product"))?;
        self.resolve(model).await
    }
}
