//! Admin entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use technex_core::domain::{Admin, NewAdmin};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Admin {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            email: model.email,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewAdmin> for ActiveModel {
    fn from(new: NewAdmin) -> Self {
        Self {
            username: Set(new.username),
            password_hash: Set(new.password_hash),
            email: Set(new.email),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }
}
