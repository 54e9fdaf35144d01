use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::entities::{cart, cart_item};
use crate::error::ApiError;
use crate::services::{products::ProductDetails, CartStore, ProductLookup};

/// The cart as returned to clients. The total is never persisted; every
/// read recomputes it from the current catalog prices, so it can change
/// between reads without any cart mutation.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub id: i32,
    pub items: Vec<CartLine>,
    pub total_price: f64,
}

#[derive(Debug, Serialize)]
pub struct CartLine {
    pub product: ProductDetails,
    pub quantity: i32,
    pub subtotal: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCartItem {
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartItem {
    #[validate(range(min = 0))]
    pub quantity: i32,
}

pub struct CartService {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductLookup>,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, products: Arc<dyn ProductLookup>) -> Self {
        Self { store, products }
    }

    /// Fails with `NotFound` if the account never had a cart, and with
    /// `ProductUnavailable` if any line references a product that no
    /// longer resolves. Unresolvable lines are never silently dropped.
    pub async fn find_cart(&self, user_id: i32) -> Result<CartView, ApiError> {
        let cart = self
            .store
            .find_cart(user_id)
            .await?
            .ok_or(ApiError::NotFound("cart"))?;

        let items = self.store.items(cart.id).await?;
        let mut lines = Vec::with_capacity(items.len());
        let mut total_price = 0.0;
        for item in items {
            let product = self.resolve_line_product(item.product_id).await?;
            let subtotal = product.price * item.quantity as f64;
            total_price += subtotal;
            lines.push(CartLine {
                product,
                quantity: item.quantity,
                subtotal,
            });
        }

        Ok(CartView {
            id: cart.id,
            items: lines,
            total_price,
        })
    }

    /// Merge semantics: a second add of the same product increments the
    /// existing line instead of appending another one.
    pub async fn add_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartLine, ApiError> {
        if quantity < 1 {
            return Err(ApiError::Validation(
                "quantity must be at least 1".to_owned(),
            ));
        }

        let product = self.products.find_by_id(product_id).await?;

        let cart = match self.store.find_cart(user_id).await? {
            Some(cart) => cart,
            None => self.store.create_cart(user_id).await?,
        };

        let quantity = match self.store.find_item(cart.id, product_id).await? {
            Some(existing) => {
                let merged = existing.quantity + quantity;
                self.store.set_item_quantity(existing.id, merged).await?;
                merged
            }
            None => {
                self.store
                    .insert_item(cart.id, product_id, quantity)
                    .await?;
                quantity
            }
        };

        tracing::debug!(user_id, product_id, quantity, "cart line added");
        Ok(CartLine {
            subtotal: product.price * quantity as f64,
            product,
            quantity,
        })
    }

    /// Sets (not merges) the quantity of an existing line; a quantity of
    /// zero removes the line instead of storing it.
    pub async fn update_item(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<Option<CartLine>, ApiError> {
        if quantity < 0 {
            return Err(ApiError::Validation(
                "quantity must not be negative".to_owned(),
            ));
        }

        let product = self.products.find_by_id(product_id).await?;
        let cart = self
            .store
            .find_cart(user_id)
            .await?
            .ok_or(ApiError::NotFound("cart"))?;
        let item = self
            .store
            .find_item(cart.id, product_id)
            .await?
            .ok_or(ApiError::NotFound("cart item"))?;

        if quantity == 0 {
            self.store.delete_item(cart.id, product_id).await?;
            return Ok(None);
        }

        self.store.set_item_quantity(item.id, quantity).await?;
        Ok(Some(CartLine {
            subtotal: product.price * quantity as f64,
            product,
            quantity,
        }))
    }

    /// Idempotent: removing a product that is not in the cart (or when
    /// the account has no cart at all) succeeds.
    pub async fn remove_item(&self, user_id: i32, product_id: i32) -> Result<(), ApiError> {
        if let Some(cart) = self.store.find_cart(user_id).await? {
            self.store.delete_item(cart.id, product_id).await?;
        }
        Ok(())
    }

    /// Idempotent: clearing an empty or missing cart succeeds.
    pub async fn clear(&self, user_id: i32) -> Result<(), ApiError> {
        if let Some(cart) = self.store.find_cart(user_id).await? {
            self.store.clear(cart.id).await?;
        }
        Ok(())
    }

    async fn resolve_line_product(&self, product_id: i32) -> Result<ProductDetails, ApiError> {
        self.products
            .find_by_id(product_id)
            .await
            .map_err(|err| match err {
                ApiError::NotFound(_) => ApiError::ProductUnavailable(product_id),
                other => other,
            })
    }
}

pub struct SeaOrmCartStore {
    db: DatabaseConnection,
}

impl SeaOrmCartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for SeaOrmCartStore {
    async fn find_cart(&self, user_id: i32) -> Result<Option<cart::Model>, ApiError> {
        Ok(cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    async fn create_cart(&self, user_id: i32) -> Result<cart::Model, ApiError> {
        Ok(cart::ActiveModel {
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    async fn items(&self, cart_id: i32) -> Result<Vec<cart_item::Model>, ApiError> {
        Ok(cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .all(&self.db)
            .await?)
    }

    async fn find_item(
        &self,
        cart_id: i32,
        product_id: i32,
    ) -> Result<Option<cart_item::Model>, ApiError> {
        Ok(cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?)
    }

    async fn insert_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<cart_item::Model, ApiError> {
        Ok(cart_item::ActiveModel {
            cart_id: Set(cart_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    async fn set_item_quantity(&self, item_id: i32, quantity: i32) -> Result<(), ApiError> {
        let txn = self.db.begin().await?;
        let item = cart_item::Entity::find_by_id(item_id)
            .one(&txn)
            .await?
            .ok_or(ApiError::NotFound("cart item"))?;
        let mut active: cart_item::ActiveModel = item.into();
        active.quantity = Set(quantity);
        active.update(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete_item(&self, cart_id: i32, product_id: i32) -> Result<(), ApiError> {
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn clear(&self, cart_id: i32) -> Result<(), ApiError> {
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
