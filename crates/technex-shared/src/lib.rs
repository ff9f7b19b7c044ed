//! # TechNex Shared
//!
//! Wire types shared by the API server and its clients: request bodies that
//! are not validated forms, JSON response shapes and the error body.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldDetail};
