mod error;
mod models;
mod query;
mod schema;
mod store;
mod trait_def;
mod validation;

pub use error::{CatalogError, CatalogResult};
pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
pub use validation::{MAX_RATING, MIN_RATING};
