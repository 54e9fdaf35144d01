pub mod addresses;
pub mod areas;
pub mod carts;
pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::entities::{cart, cart_item, city, province};
use crate::error::ApiError;
use products::ProductDetails;

/// Read-only access to the catalog, as seen by the cart and order flow.
/// The cart logic depends on this contract only, not on the storage
/// behind it.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn find_by_id(&self, product_id: i32) -> Result<ProductDetails, ApiError>;
}

/// Persistence seam for carts and their line items.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_cart(&self, user_id: i32) -> Result<Option<cart::Model>, ApiError>;
    async fn create_cart(&self, user_id: i32) -> Result<cart::Model, ApiError>;
    async fn items(&self, cart_id: i32) -> Result<Vec<cart_item::Model>, ApiError>;
    async fn find_item(
        &self,
        cart_id: i32,
        product_id: i32,
    ) -> Result<Option<cart_item::Model>, ApiError>;
    async fn insert_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<cart_item::Model, ApiError>;
    async fn set_item_quantity(&self, item_id: i32, quantity: i32) -> Result<(), ApiError>;
    async fn delete_item(&self, cart_id: i32, product_id: i32) -> Result<(), ApiError>;
    async fn clear(&self, cart_id: i32) -> Result<(), ApiError>;
}

/// Area catalog reads used to gate address and shipment writes.
#[async_trait]
pub trait AreaLookup: Send + Sync {
    async fn find_province(&self, province_id: i32) -> Result<province::Model, ApiError>;
    async fn find_city(&self, city_id: i32) -> Result<city::Model, ApiError>;
    /// Fails with a location `NotFound` unless the city exists and its
    /// stored province reference matches `province_id`.
    async fn validate_location(
        &self,
        province_id: i32,
        city_id: i32,
    ) -> Result<city::Model, ApiError>;
}

pub struct Services {
    pub users: users::UserService,
    pub stores: stores::StoreService,
    pub products: Arc<products::ProductService>,
    pub carts: Arc<carts::CartService>,
    pub orders: orders::OrderService,
    pub areas: Arc<areas::AreaService>,
    pub addresses: addresses::AddressService,
}

pub fn build_services(db: DatabaseConnection, jwt_secret: &str) -> Arc<Services> {
    let products = Arc::new(products::ProductService::new(db.clone()));
    let areas = Arc::new(areas::AreaService::new(db.clone()));

    let cart_store: Arc<dyn CartStore> = Arc::new(carts::SeaOrmCartStore::new(db.clone()));
    let carts = Arc::new(carts::CartService::new(
        cart_store,
        products.clone() as Arc<dyn ProductLookup>,
    ));

    Arc::new(Services {
        users: users::UserService::new(db.clone(), jwt_secret.to_owned()),
        stores: stores::StoreService::new(
            db.clone(),
            areas.clone() as Arc<dyn AreaLookup>,
            jwt_secret.to_owned(),
        ),
        orders: orders::OrderService::new(db.clone(), carts.clone()),
        addresses: addresses::AddressService::new(db, areas.clone() as Arc<dyn AreaLookup>),
        products,
        carts,
        areas,
    })
}
