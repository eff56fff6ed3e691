mod catalog;
mod optimizer;

pub use catalog::{CatalogFailure, CatalogRepository};
pub use optimizer::Optimizer;
