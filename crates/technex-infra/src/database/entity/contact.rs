//! Contact entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use technex_core::domain::{Contact, NewContact};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub project: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contact {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            company: model.company,
            project: model.project,
            message: model.message,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewContact> for ActiveModel {
    fn from(new: NewContact) -> Self {
        Self {
            name: Set(new.name),
            email: Set(new.email),
            company: Set(new.company),
            project: Set(new.project),
            message: Set(new.message),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }
}
