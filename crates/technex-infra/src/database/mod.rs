//! Persistence gateway: connection pool, entities and repositories.

mod base;
mod connections;
pub mod entity;
mod repositories;

pub use base::{SqlRepository, Table};
pub use connections::{DatabaseConfig, SqlStoreProbe, connect};
pub use repositories::{
    SqlAdminRepository, SqlApplicationRepository, SqlContactRepository, SqlJobRepository,
    SqlPostRepository,
};
