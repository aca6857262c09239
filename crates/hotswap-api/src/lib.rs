//! hotswap-api: REST API for hotswap.
//!
//! Devices call `/api/v1/check`; operators manage the catalog through the
//! `/api/v1/bundles` routes.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/check` | Resolve an update check (`platform`, `appVersion`, `bundleId`) |
//! | GET | `/api/v1/bundles` | List bundles, optionally by `platform` and `appVersion` |
//! | POST | `/api/v1/bundles` | Publish a bundle |
//! | GET | `/api/v1/bundles/{id}` | Get one bundle |
//! | PATCH | `/api/v1/bundles/{id}` | Enable/disable, toggle force update, edit message |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use hotswap_catalog::CatalogStore;

pub use handlers::WARNINGS_HEADER;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: CatalogStore,
}

/// Build the complete API router.
pub fn build_router(store: CatalogStore) -> Router {
    let api_state = ApiState { store };

    let api_routes = Router::new()
        .route("/check", get(handlers::check))
        .route(
            "/bundles",
            get(handlers::list_bundles).post(handlers::create_bundle),
        )
        .route(
            "/bundles/{id}",
            get(handlers::get_bundle).patch(handlers::patch_bundle),
        )
        .with_state(api_state);

    Router::new().nest("/api/v1", api_routes)
}
