//! CatalogStore: redb-backed bundle persistence.
//!
//! Reads hand out whole snapshots taken inside a single read transaction,
//! so a resolver never sees a catalog mid-publish.

use std::path::Path;
use std::sync::Arc;

use hotswap_core::{Bundle, BundleId, BundlePatch, BundleSource};
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::tables::BUNDLES;

/// Convert any `Display` error into a `CatalogError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| CatalogError::$variant(e.to_string())
    };
}

/// Thread-safe bundle catalog backed by redb.
#[derive(Clone, Debug)]
pub struct CatalogStore {
    db: Arc<Database>,
}

impl CatalogStore {
    /// Open (or create) a persistent catalog at the given path.
    pub fn open(path: &Path) -> CatalogResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "catalog opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory catalog.
    pub fn open_in_memory() -> CatalogResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory catalog opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> CatalogResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(BUNDLES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Reads ──────────────────────────────────────────────────────

    /// Every bundle in the catalog, newest id first.
    pub fn list_bundles(&self) -> CatalogResult<Vec<Bundle>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BUNDLES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let bundle: Bundle =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(bundle);
        }
        results.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(results)
    }

    pub fn get_bundle(&self, id: &BundleId) -> CatalogResult<Option<Bundle>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BUNDLES).map_err(map_err!(Table))?;
        match table.get(id.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let bundle: Bundle =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(bundle))
            }
            None => Ok(None),
        }
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Publish a new bundle.
    ///
    /// Fails with `Duplicate` if the id is taken and with `NotMonotonic`
    /// if the id does not sort above every stored id.
    pub fn append_bundle(&self, bundle: &Bundle) -> CatalogResult<()> {
        let value = serde_json::to_vec(bundle).map_err(map_err!(Serialize))?;
        let key = bundle.id.as_str();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(BUNDLES).map_err(map_err!(Table))?;
            if table.get(key).map_err(map_err!(Read))?.is_some() {
                return Err(CatalogError::Duplicate(key.to_string()));
            }

            // Stored keys sort bytewise, which is not quite `BundleId`
            // order (NIL sorts first), so take the max explicitly.
            let mut latest = BundleId::nil();
            for entry in table.iter().map_err(map_err!(Read))? {
                let (stored, _) = entry.map_err(map_err!(Read))?;
                let stored = BundleId::parse(stored.value()).map_err(map_err!(Deserialize))?;
                if stored > latest {
                    latest = stored;
                }
            }
            if bundle.id <= latest {
                return Err(CatalogError::NotMonotonic {
                    id: key.to_string(),
                    latest: latest.to_string(),
                });
            }

            table
                .insert(key, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        info!(
            bundle_id = %bundle.id,
            platform = %bundle.platform,
            target_version = %bundle.target_version,
            enabled = bundle.enabled,
            "bundle published"
        );
        Ok(())
    }

    /// Apply `patch` to a stored bundle and return the result.
    pub fn update_bundle(&self, id: &BundleId, patch: &BundlePatch) -> CatalogResult<Bundle> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let bundle;
        {
            let mut table = txn.open_table(BUNDLES).map_err(map_err!(Table))?;
            let mut stored: Bundle = match table.get(id.as_str()).map_err(map_err!(Read))? {
                Some(guard) => {
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?
                }
                None => return Err(CatalogError::NotFound(id.to_string())),
            };
            patch.apply(&mut stored);
            let value = serde_json::to_vec(&stored).map_err(map_err!(Serialize))?;
            table
                .insert(id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
            bundle = stored;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(
            bundle_id = %id,
            enabled = bundle.enabled,
            force_update = bundle.force_update,
            "bundle updated"
        );
        Ok(bundle)
    }

    pub fn set_enabled(&self, id: &BundleId, enabled: bool) -> CatalogResult<Bundle> {
        self.update_bundle(id, &BundlePatch::enabled(enabled))
    }
}

impl BundleSource for CatalogStore {
    type Error = CatalogError;

    fn list_bundles(&self) -> Result<Vec<Bundle>, Self::Error> {
        CatalogStore::list_bundles(self)
    }
}
