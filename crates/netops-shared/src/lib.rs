//! # netops-shared
//!
//! Data model shared by the validation engine and its adapters: operators,
//! their servers, conditions acceptance, and the error types that cross
//! crate boundaries.

pub mod constants;
pub mod error;
pub mod host;
pub mod models;
pub mod types;

pub use error::{AuthorityError, DuplicateServer, UserServersError};
pub use models::*;
pub use types::*;
