//! SeaORM entities, one per table.

pub mod admin;
pub mod application;
pub mod contact;
pub mod job;
pub mod post;
