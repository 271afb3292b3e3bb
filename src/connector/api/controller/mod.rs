pub mod catalog_controller;
pub mod direct_search_controller;
pub mod options_controller;
pub mod search_controller;

pub use catalog_controller::CatalogController;
pub use direct_search_controller::DirectSearchController;
pub use options_controller::OptionsController;
pub use search_controller::SearchController;
