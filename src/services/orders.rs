use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use crate::entities::order::Status;
use crate::entities::{cart_item, order, order_item};
use crate::error::ApiError;
use crate::services::carts::CartService;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactInfo {
    #[validate(length(min = 3, max = 255))]
    pub full_name: String,
    #[validate(length(min = 8, max = 20))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrder {
    pub status: String,
    pub delivered_at: Option<chrono::DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: i32,
    pub user_id: i32,
    pub status: Status,
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: chrono::DateTime<Utc>,
    pub delivered_at: Option<chrono::DateTime<Utc>>,
    pub items: Vec<order_item::Model>,
    pub total_price: f64,
}

pub struct OrderService {
    db: DatabaseConnection,
    carts: Arc<CartService>,
}

impl OrderService {
    pub fn new(db: DatabaseConnection, carts: Arc<CartService>) -> Self {
        Self { db, carts }
    }

    /// Snapshots the cart into an immutable order. The cart is read
    /// through the cart service, so product resolution (and
    /// `ProductUnavailable`) applies; an account that never had a cart
    /// fails that read with the cart `NotFound`, and only an existing
    /// cart with zero items maps to `EmptyCart`. Both fail before any
    /// write. Order insert and cart clear commit in one transaction:
    /// either the order exists and the cart is empty, or neither
    /// happened.
    pub async fn create_order(
        &self,
        user_id: i32,
        contact: ContactInfo,
    ) -> Result<OrderView, ApiError> {
        let cart = self.carts.find_cart(user_id).await?;
        if cart.items.is_empty() {
            return Err(ApiError::EmptyCart);
        }

        let txn = self.db.begin().await?;

        let created = order::ActiveModel {
            user_id: Set(user_id),
            status: Set(Status::Pending),
            full_name: Set(contact.full_name),
            phone_number: Set(contact.phone_number),
            address: Set(contact.address),
            created_at: Set(Utc::now()),
            delivered_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let snapshot: Vec<order_item::ActiveModel> = cart
            .items
            .iter()
            .map(|line| order_item::ActiveModel {
                order_id: Set(created.id),
                product_id: Set(line.product.id),
                quantity: Set(line.quantity),
                unit_price: Set(line.product.price),
                ..Default::default()
            })
            .collect();
        order_item::Entity::insert_many(snapshot).exec(&txn).await?;

        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(order_id = created.id, user_id, "order created");
        self.load_view(created).await
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderView>, ApiError> {
        let orders = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::Id)
            .all(&self.db)
            .await?;
        self.load_views(orders).await
    }

    pub async fn find_all(&self) -> Result<Vec<OrderView>, ApiError> {
        let orders = order::Entity::find()
            .order_by_desc(order::Column::Id)
            .all(&self.db)
            .await?;
        self.load_views(orders).await
    }

    /// Administrative status update, the only way an order moves through
    /// its lifecycle. Illegal transitions are rejected.
    pub async fn update(&self, order_id: i32, input: UpdateOrder) -> Result<OrderView, ApiError> {
        let next = Status::from_str(&input.status).map_err(ApiError::Validation)?;

        let model = order::Entity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("order"))?;

        if !model.status.can_transition_to(next) {
            return Err(ApiError::Validation(format!(
                "cannot transition order from {} to {}",
                model.status, next
            )));
        }

        let mut active: order::ActiveModel = model.into();
        active.status = Set(next);
        if next == Status::Delivered {
            active.delivered_at = Set(Some(input.delivered_at.unwrap_or_else(Utc::now)));
        }
        let updated = active.update(&self.db).await?;

        tracing::info!(order_id, status = %next, "order updated");
        self.load_view(updated).await
    }

    /// Payment is an external collaborator; this returns the checkout
    /// URL for an order owned by the requester. The stub provider builds
    /// a deterministic URL from the order id.
    pub async fn payment_link(&self, user_id: i32, order_id: i32) -> Result<String, ApiError> {
        let model = order::Entity::find_by_id(order_id)
            .filter(order::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("order"))?;

        Ok(format!("https://pay.example/checkout/{}", model.id))
    }

    async fn load_views(&self, orders: Vec<order::Model>) -> Result<Vec<OrderView>, ApiError> {
        let mut views = Vec::with_capacity(orders.len());
        for model in orders {
            views.push(self.load_view(model).await?);
        }
        Ok(views)
    }

    async fn load_view(&self, model: order::Model) -> Result<OrderView, ApiError> {
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(model.id))
            .all(&self.db)
            .await?;

        let total_price = items
            .iter()
            .map(|item| item.unit_price * item.quantity as f64)
            .sum();

        Ok(OrderView {
            id: model.id,
            user_id: model.user_id,
            status: model.status,
            full_name: model.full_name,
            phone_number: model.phone_number,
            address: model.address,
            created_at: model.created_at,
            delivered_at: model.delivered_at,
            items,
            total_price,
        })
    }
}
