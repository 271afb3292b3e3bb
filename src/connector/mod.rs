//! # Connector Layer
//!
//! Everything that talks to the outside world:
//! - Adapters for the search model, the vehicle catalogues and marketplaces
//! - The HTTP API and the CLI dispatch built on top of the use cases

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
