//! redb table definitions for the bundle catalog.

use redb::TableDefinition;

/// Bundles keyed by bundle id, values are JSON-serialized `Bundle`s.
pub const BUNDLES: TableDefinition<&str, &[u8]> = TableDefinition::new("bundles");
