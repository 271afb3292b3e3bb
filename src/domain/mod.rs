//! # Domain Layer
//!
//! Search criteria, listings, marketplace catalogues, and the pure services
//! that turn free-form search answers into validated listings.
//! This layer is independent of HTTP and of any particular upstream API.

pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
