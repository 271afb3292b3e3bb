mod car_listing;
pub mod equipment;
mod form_options;
mod search_request;
mod search_response;
pub mod site;

pub use car_listing::*;
pub use form_options::*;
pub use search_request::*;
pub use search_response::*;
