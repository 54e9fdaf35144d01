use sea_orm::entity::prelude::*;
use serde::Serialize;

// Province/city pair is validated against the area catalog when the row
// is written, not re-validated on later reads.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub user_id: i32,
    pub full_name: String,
    pub phone_number: String,
    pub province_id: i32,
    pub city_id: i32,
    #[sea_orm(column_type = "Text")]
    pub street: String,
    pub is_primary: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::user::Entity",
        from = "Column::UserId",
        to = "crate::entities::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}
