//! # Application Layer
//!
//! Ports to the outside world and the use cases that orchestrate them
//! around the domain services.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
