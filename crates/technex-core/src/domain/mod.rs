//! Domain entities - the core business objects.

mod admin;
mod application;
mod contact;
mod job;
mod pagination;
mod post;

pub use admin::{Admin, NewAdmin};
pub use application::{Application, ApplicationDraft, NewApplication};
pub use contact::{Contact, NewContact};
pub use job::{Job, JobTag, JobType, NewJob, UnknownVariant};
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE, MAX_PAGE_SIZE, Page, PageRequest};
pub use post::{NewPost, Post};
