//! Read side of the bundle catalog.
//!
//! Resolution only ever needs a point-in-time snapshot of every bundle.
//! Whoever owns the catalog decides how that snapshot is produced.

use std::convert::Infallible;

use crate::types::Bundle;

/// Anything that can hand out a consistent snapshot of the catalog.
pub trait BundleSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_bundles(&self) -> Result<Vec<Bundle>, Self::Error>;
}

impl BundleSource for [Bundle] {
    type Error = Infallible;

    fn list_bundles(&self) -> Result<Vec<Bundle>, Self::Error> {
        Ok(self.to_vec())
    }
}

impl BundleSource for Vec<Bundle> {
    type Error = Infallible;

    fn list_bundles(&self) -> Result<Vec<Bundle>, Self::Error> {
        Ok(self.clone())
    }
}

impl<T: BundleSource + ?Sized> BundleSource for &T {
    type Error = T::Error;

    fn list_bundles(&self) -> Result<Vec<Bundle>, Self::Error> {
        (**self).list_bundles()
    }
}
