//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use technex_core::domain::{NewPost, Post};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub author: String,
    pub category: String,
    pub icon: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            excerpt: model.excerpt,
            content: model.content,
            author: model.author,
            category: model.category,
            icon: model.icon,
            slug: model.slug,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from a validated post to a SeaORM ActiveModel.
impl From<NewPost> for ActiveModel {
    fn from(new: NewPost) -> Self {
        Self {
            title: Set(new.title),
            excerpt: Set(new.excerpt),
            content: Set(new.content),
            author: Set(new.author),
            category: Set(new.category),
            icon: Set(new.icon),
            slug: Set(new.slug),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }
}
