//! # TechNex Core
//!
//! The domain layer of the TechNex backend.
//! Entities, ports and the submission rule sets live here; nothing in this
//! crate performs I/O.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::RepoError;
pub use validation::{FieldError, ValidationErrors};
