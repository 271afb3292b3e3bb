//! Domain services: pure logic shared by every search path.

mod error;
mod listing_validator;
mod prompt_builder;
mod response_parser;
mod url_normalize;

pub use error::*;
pub use listing_validator::*;
pub use prompt_builder::*;
pub use response_parser::*;
pub use url_normalize::*;
