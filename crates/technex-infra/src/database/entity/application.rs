//! Application entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use technex_core::domain::{Application, NewApplication};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_title: String,
    pub name: String,
    pub email: String,
    pub resume_path: String,
    pub portfolio_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_letter: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Application {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            job_title: model.job_title,
            name: model.name,
            email: model.email,
            resume_path: model.resume_path,
            portfolio_url: model.portfolio_url,
            cover_letter: model.cover_letter,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewApplication> for ActiveModel {
    fn from(new: NewApplication) -> Self {
        Self {
            job_title: Set(new.job_title),
            name: Set(new.name),
            email: Set(new.email),
            resume_path: Set(new.resume_path),
            portfolio_url: Set(new.portfolio_url),
            cover_letter: Set(new.cover_letter),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }
}
