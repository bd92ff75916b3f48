//! Visual novel catalog library
//!
//! The catalog store, the schema layer it is built on, and the form and
//! rendering helpers used by the shell.

pub mod actions;
pub mod catalog_store;
pub mod config;
pub mod render;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use actions::{Action, Command, FormFields, Outcome};
pub use catalog_store::{CatalogError, CatalogStore, SqliteCatalogStore};
pub use render::OutputFormat;
