pub mod config;
pub mod id;
pub mod source;
pub mod types;
pub mod version;

pub use config::HotswapConfig;
pub use id::{BundleId, BundleIdError, NIL_BUNDLE_ID};
pub use source::BundleSource;
pub use types::*;
pub use version::{VersionError, VersionRange, parse_app_version};
