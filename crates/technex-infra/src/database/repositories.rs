//! SeaORM repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};

use technex_core::domain::{
    Admin, Application, Contact, Job, NewAdmin, Page, PageRequest, Post,
};
use technex_core::error::RepoError;
use technex_core::ports::{
    AdminRepository, ApplicationRepository, BaseRepository, ContactRepository, JobRepository,
    PostRepository,
};

use super::base::{SqlRepository, Table, classify};
use super::entity::{admin, application, contact, job, post};
use crate::redact::mask_email;

pub type SqlContactRepository = SqlRepository<contact::Entity>;
pub type SqlApplicationRepository = SqlRepository<application::Entity>;
pub type SqlPostRepository = SqlRepository<post::Entity>;
pub type SqlJobRepository = SqlRepository<job::Entity>;
pub type SqlAdminRepository = SqlRepository<admin::Entity>;

impl Table for contact::Entity {
    const DUPLICATE_MESSAGE: &'static str = "This message was already received.";

    fn created_at() -> Self::Column {
        contact::Column::CreatedAt
    }

    fn id() -> Self::Column {
        contact::Column::Id
    }
}

impl Table for application::Entity {
    const DUPLICATE_MESSAGE: &'static str = "This application was already received.";

    fn created_at() -> Self::Column {
        application::Column::CreatedAt
    }

    fn id() -> Self::Column {
        application::Column::Id
    }
}

impl Table for post::Entity {
    const DUPLICATE_MESSAGE: &'static str = "A post with this slug already exists.";

    fn created_at() -> Self::Column {
        post::Column::CreatedAt
    }

    fn id() -> Self::Column {
        post::Column::Id
    }
}

impl Table for job::Entity {
    const DUPLICATE_MESSAGE: &'static str = "This job listing already exists.";

    fn created_at() -> Self::Column {
        job::Column::CreatedAt
    }

    fn id() -> Self::Column {
        job::Column::Id
    }
}

impl Table for admin::Entity {
    const DUPLICATE_MESSAGE: &'static str = "An admin with this username or email already exists.";

    fn created_at() -> Self::Column {
        admin::Column::CreatedAt
    }

    fn id() -> Self::Column {
        admin::Column::Id
    }
}

#[async_trait]
impl ContactRepository for SqlContactRepository {
    async fn list_newest_first(&self) -> Result<Vec<Contact>, RepoError> {
        let rows = self.all_newest_first().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ApplicationRepository for SqlApplicationRepository {
    async fn list_newest_first(&self) -> Result<Vec<Application>, RepoError> {
        let rows = self.all_newest_first().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(classify::<post::Entity>)?;

        Ok(result.map(Into::into))
    }

    async fn list_page(&self, request: PageRequest) -> Result<Page<Post>, RepoError> {
        let (rows, total) = self.page(request).await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
            request,
        })
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        tracing::debug!(post_id = id, "Deleting post");
        self.delete_by_id(id).await
    }
}

#[async_trait]
impl JobRepository for SqlJobRepository {
    async fn list_page(&self, request: PageRequest) -> Result<Page<Job>, RepoError> {
        let (rows, total) = self.page(request).await?;
        let items = rows
            .into_iter()
            .map(Job::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total,
            request,
        })
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        tracing::debug!(job_id = id, "Deleting job");
        self.delete_by_id(id).await
    }
}

#[async_trait]
impl AdminRepository for SqlAdminRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<Admin>, RepoError> {
        tracing::debug!(login = %mask_email(login), "Finding admin by username or email");

        let result = admin::Entity::find()
            .filter(
                Condition::any()
                    .add(admin::Column::Username.eq(login))
                    .add(admin::Column::Email.eq(login)),
            )
            .one(&self.db)
            .await
            .map_err(classify::<admin::Entity>)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, admin: NewAdmin) -> Result<Admin, RepoError> {
        BaseRepository::<Admin, NewAdmin>::create(self, admin).await
    }
}
