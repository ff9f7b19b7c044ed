use async_trait::async_trait;

use crate::domain::{
    Admin, Application, Contact, Job, NewAdmin, NewApplication, NewContact, NewJob, NewPost,
    Page, PageRequest, Post,
};
use crate::error::RepoError;

/// Insert operation shared by every content table.
#[async_trait]
pub trait BaseRepository<T, N>: Send + Sync {
    /// Persist a new row and return it with its generated id.
    async fn create(&self, new: N) -> Result<T, RepoError>;
}

/// Contact messages: write-once, listed for admins.
#[async_trait]
pub trait ContactRepository: BaseRepository<Contact, NewContact> {
    async fn list_newest_first(&self) -> Result<Vec<Contact>, RepoError>;
}

/// Job applications: write-once, listed for admins.
#[async_trait]
pub trait ApplicationRepository: BaseRepository<Application, NewApplication> {
    async fn list_newest_first(&self) -> Result<Vec<Application>, RepoError>;
}

/// Blog posts.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn list_page(&self, request: PageRequest) -> Result<Page<Post>, RepoError>;

    /// Returns `RepoError::NotFound` when no row has this id.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// Job listings.
#[async_trait]
pub trait JobRepository: BaseRepository<Job, NewJob> {
    async fn list_page(&self, request: PageRequest) -> Result<Page<Job>, RepoError>;

    /// Returns `RepoError::NotFound` when no row has this id.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// Admin credentials. Read-only to request handling.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Look up an admin whose username OR email equals `login`.
    async fn find_by_login(&self, login: &str) -> Result<Option<Admin>, RepoError>;

    /// Out-of-band provisioning only.
    async fn create(&self, admin: NewAdmin) -> Result<Admin, RepoError>;
}

/// Liveness probe of the backing store.
#[async_trait]
pub trait StoreProbe: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
