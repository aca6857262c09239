//! REST API handlers.
//!
//! Admin handlers read/write via `CatalogStore` and wrap their JSON in the
//! `{success, data, error}` envelope. The device-facing `check` handler
//! returns the bare update payload (or `null`).

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::info;

use hotswap_catalog::CatalogError;
use hotswap_core::{
    Bundle, BundleId, BundlePatch, CheckRequest, Platform, VersionRange, parse_app_version,
};
use hotswap_resolver::{CheckError, check_for_update, eligible_bundles};

use crate::ApiState;

/// Response header carrying the number of catalog data-quality warnings
/// seen while answering the request.
pub const WARNINGS_HEADER: &str = "x-hotswap-warnings";

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn catalog_error_response(e: &CatalogError) -> axum::response::Response {
    let status = match e {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Duplicate(_) | CatalogError::NotMonotonic { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(&e.to_string(), status).into_response()
}

fn parse_id(raw: &str) -> Result<BundleId, axum::response::Response> {
    BundleId::parse(raw)
        .map_err(|e| error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response())
}

// ── Update check ───────────────────────────────────────────────

/// Query string of an update check. A missing or empty `bundleId` means the
/// device runs the bundle embedded in the app.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuery {
    pub platform: Platform,
    pub app_version: String,
    #[serde(default)]
    pub bundle_id: Option<String>,
}

/// GET /api/v1/check
pub async fn check(
    State(state): State<ApiState>,
    Query(query): Query<CheckQuery>,
) -> impl IntoResponse {
    let bundle_id = match query.bundle_id.as_deref().map(str::trim) {
        None | Some("") => BundleId::nil(),
        Some(raw) => match parse_id(raw) {
            Ok(id) => id,
            Err(resp) => return resp,
        },
    };
    let request = CheckRequest::new(query.platform, query.app_version, bundle_id);

    match check_for_update(&state.store, &request) {
        Ok(resolution) => {
            info!(
                platform = %request.platform,
                app_version = %request.app_version,
                bundle_id = %request.bundle_id,
                status = ?resolution.decision.status(),
                target = resolution.decision.target().map(|t| t.id.as_str()),
                warnings = resolution.warnings.len(),
                "update check"
            );
            (
                [(WARNINGS_HEADER, resolution.warnings.len().to_string())],
                Json(resolution.decision),
            )
                .into_response()
        }
        Err(CheckError::Resolve(e)) => {
            error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response()
        }
        Err(CheckError::Source(e)) => catalog_error_response(&e),
    }
}

// ── Bundles ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub platform: Option<Platform>,
    pub app_version: Option<String>,
}

/// GET /api/v1/bundles
pub async fn list_bundles(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let bundles = match state.store.list_bundles() {
        Ok(bundles) => bundles,
        Err(e) => return catalog_error_response(&e),
    };

    let app_version = match query.app_version.as_deref().map(parse_app_version) {
        Some(Ok(version)) => Some(version),
        Some(Err(e)) => {
            return error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response();
        }
        None => None,
    };

    let Some(platform) = query.platform else {
        if app_version.is_some() {
            return error_response(
                "appVersion filter requires a platform",
                StatusCode::BAD_REQUEST,
            )
            .into_response();
        }
        return ([(WARNINGS_HEADER, "0".to_string())], ApiResponse::ok(bundles)).into_response();
    };

    let listing = eligible_bundles(&bundles, platform, app_version.as_ref());
    (
        [(WARNINGS_HEADER, listing.warnings.len().to_string())],
        ApiResponse::ok(listing.rows),
    )
        .into_response()
}

/// GET /api/v1/bundles/{id}
pub async fn get_bundle(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.store.get_bundle(&id) {
        Ok(Some(bundle)) => ApiResponse::ok(bundle).into_response(),
        Ok(None) => error_response("bundle not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => catalog_error_response(&e),
    }
}

/// POST /api/v1/bundles
pub async fn create_bundle(
    State(state): State<ApiState>,
    Json(bundle): Json<Bundle>,
) -> impl IntoResponse {
    if let Err(e) = VersionRange::parse(&bundle.target_version) {
        return error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response();
    }

    match state.store.append_bundle(&bundle) {
        Ok(()) => (StatusCode::CREATED, ApiResponse::ok(bundle)).into_response(),
        Err(e) => catalog_error_response(&e),
    }
}

/// PATCH /api/v1/bundles/{id}
pub async fn patch_bundle(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(patch): Json<BundlePatch>,
) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if patch.is_empty() {
        return error_response("patch has no fields", StatusCode::BAD_REQUEST).into_response();
    }
    match state.store.update_bundle(&id, &patch) {
        Ok(bundle) => ApiResponse::ok(bundle).into_response(),
        Err(e) => catalog_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotswap_catalog::CatalogStore;

    fn test_state() -> ApiState {
        let store = CatalogStore::open_in_memory().unwrap();
        ApiState { store }
    }

    fn test_bundle(id: &str, target: &str) -> Bundle {
        Bundle {
            id: BundleId::parse(id).unwrap(),
            platform: Platform::Ios,
            target_version: target.to_string(),
            file_url: Some(format!("https://cdn.example.com/{id}.zip")),
            file_hash: Some("hash".to_string()),
            force_update: false,
            enabled: true,
            git_commit_hash: None,
            message: None,
        }
    }

    fn check_query(app_version: &str, bundle_id: Option<&str>) -> Query<CheckQuery> {
        Query(CheckQuery {
            platform: Platform::Ios,
            app_version: app_version.to_string(),
            bundle_id: bundle_id.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn check_empty_catalog() {
        let state = test_state();
        let resp = check(State(state), check_query("1.0", None)).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(WARNINGS_HEADER).unwrap(), "0");
    }

    #[tokio::test]
    async fn check_rejects_bad_app_version() {
        let state = test_state();
        let resp = check(State(state), check_query("latest", None)).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn check_rejects_bad_bundle_id() {
        let state = test_state();
        let resp = check(State(state), check_query("1.0", Some("a b"))).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn check_counts_warnings() {
        let state = test_state();
        state.store.append_bundle(&test_bundle("1", "1.0")).unwrap();
        state.store.append_bundle(&test_bundle("2", "??")).unwrap();

        let resp = check(State(state), check_query("1.0", Some(""))).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(WARNINGS_HEADER).unwrap(), "1");
    }

    #[tokio::test]
    async fn list_bundles_empty() {
        let state = test_state();
        let resp = list_bundles(State(state), Query(ListQuery::default())).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn list_bundles_version_without_platform() {
        let state = test_state();
        let query = ListQuery {
            platform: None,
            app_version: Some("1.0".to_string()),
        };
        let resp = list_bundles(State(state), Query(query)).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_and_get_bundle() {
        let state = test_state();
        let bundle = test_bundle("1", "1.x");

        let resp = create_bundle(State(state.clone()), Json(bundle)).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = get_bundle(State(state), Path("1".to_string())).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_rejects_malformed_range() {
        let state = test_state();
        let resp = create_bundle(State(state.clone()), Json(test_bundle("1", "one.two"))).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(state.store.list_bundles().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_conflicts_on_older_id() {
        let state = test_state();
        state.store.append_bundle(&test_bundle("5", "1.0")).unwrap();

        let resp = create_bundle(State(state), Json(test_bundle("3", "1.0"))).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn get_nonexistent_bundle() {
        let state = test_state();
        let resp = get_bundle(State(state), Path("nope".to_string())).await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_disables_bundle() {
        let state = test_state();
        state.store.append_bundle(&test_bundle("1", "1.0")).unwrap();

        let resp = patch_bundle(
            State(state.clone()),
            Path("1".to_string()),
            Json(BundlePatch::enabled(false)),
        )
        .await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let stored = state
            .store
            .get_bundle(&BundleId::parse("1").unwrap())
            .unwrap()
            .unwrap();
        assert!(!stored.enabled);
    }

    #[tokio::test]
    async fn patch_nonexistent_bundle() {
        let state = test_state();
        let resp = patch_bundle(
            State(state),
            Path("404".to_string()),
            Json(BundlePatch::force_update(true)),
        )
        .await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let state = test_state();
        let resp = patch_bundle(
            State(state),
            Path("1".to_string()),
            Json(BundlePatch::default()),
        )
        .await;
        let resp = resp.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
