//! Job entity for SeaORM.
//!
//! `tag` and `type` are stored as their display strings.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use technex_core::domain::{Job, JobTag, JobType, NewJob};
use technex_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub tag: String,
    pub location: String,
    #[sea_orm(column_name = "type")]
    pub job_type: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Job {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let tag = model
            .tag
            .parse::<JobTag>()
            .map_err(|e| RepoError::Query(format!("jobs.tag: {e}")))?;
        let job_type = model
            .job_type
            .parse::<JobType>()
            .map_err(|e| RepoError::Query(format!("jobs.type: {e}")))?;

        Ok(Self {
            id: model.id,
            title: model.title,
            tag,
            location: model.location,
            job_type,
            description: model.description,
            created_at: model.created_at.into(),
        })
    }
}

impl From<NewJob> for ActiveModel {
    fn from(new: NewJob) -> Self {
        Self {
            title: Set(new.title),
            tag: Set(new.tag.as_str().to_string()),
            location: Set(new.location),
            job_type: Set(new.job_type.as_str().to_string()),
            description: Set(new.description),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }
}
