//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestCatalog, CLANNAD_TITLE};
//! use vn_catalog::CatalogStore;
//!
//! #[test]
//! fn test_show_clannad() {
//!     let catalog = TestCatalog::in_memory();
//!     let details = catalog.store.get_visual_novel_details(catalog.clannad).unwrap();
//!     assert_eq!(details.novel.novel.title, CLANNAD_TITLE);
//! }
//! ```

mod constants;
mod fixtures;

#[allow(unused_imports)]
pub use constants::*;
pub use fixtures::TestCatalog;
