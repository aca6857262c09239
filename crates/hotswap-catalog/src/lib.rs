//! hotswap-catalog: the published-bundle catalog.
//!
//! Backed by [redb](https://docs.rs/redb). Bundles are JSON-serialized into
//! a single table keyed by bundle id. The catalog is append-only: bundles
//! are never deleted, only disabled, and new ids must sort above every id
//! already stored.
//!
//! [`CatalogStore`] is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and implements [`hotswap_core::BundleSource`], so it can be handed
//! straight to the resolver.

pub mod error;
pub mod store;
pub mod tables;

pub use error::{CatalogError, CatalogResult};
pub use store::CatalogStore;
