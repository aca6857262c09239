//! hotswap resolution: decides what a client should run next.
//!
//! Given a catalog snapshot and a client's platform, app version and
//! current bundle id, the engine answers with one of: keep what you have,
//! update to a newer bundle, or roll back.
//!
//! # Components
//!
//! - **`filter`**: platform and target-version narrowing
//! - **`rollback`**: detects clients whose bundle left the servable set
//! - **`engine`**: the decision table and [`check_for_update`]
//! - **`listing`**: operator views of the catalog

pub mod engine;
pub mod filter;
pub mod listing;
pub mod rollback;

pub use engine::{CheckError, Resolution, ResolveError, check_for_update, decide, resolve};
pub use filter::{Candidates, RangeWarning, filter_candidates};
pub use listing::{Listing, eligible_bundles};
pub use rollback::is_rollback;
