mod catalog;
mod direct_search;
mod llm_search;

pub use catalog::*;
pub use direct_search::*;
pub use llm_search::*;
