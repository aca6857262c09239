//! Router-level tests: full request/response cycles through `build_router`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hotswap_api::{WARNINGS_HEADER, build_router};
use hotswap_catalog::CatalogStore;
use hotswap_core::{Bundle, BundleId, Platform};
use serde_json::{Value, json};
use tower::ServiceExt;

const V1: &str = "00000000-0000-0000-0000-000000000001";
const V2: &str = "00000000-0000-0000-0000-000000000002";

fn test_store() -> CatalogStore {
    CatalogStore::open_in_memory().unwrap()
}

fn test_bundle(id: &str, platform: Platform, target: &str, enabled: bool) -> Bundle {
    Bundle {
        id: BundleId::parse(id).unwrap(),
        platform,
        target_version: target.to_string(),
        file_url: Some("http://example.com/bundle.zip".to_string()),
        file_hash: Some("hash".to_string()),
        force_update: false,
        enabled,
        git_commit_hash: None,
        message: None,
    }
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn check_with_no_bundles_returns_null() {
    let router = build_router(test_store());

    let resp = router
        .oneshot(get("/api/v1/check?platform=ios&appVersion=1.0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, Value::Null);
}

#[tokio::test]
async fn check_offers_latest_bundle() {
    let store = test_store();
    store
        .append_bundle(&test_bundle(V1, Platform::Ios, "1.x.x", true))
        .unwrap();
    store
        .append_bundle(&test_bundle(V2, Platform::Ios, "1.0", true))
        .unwrap();
    let router = build_router(store);

    let resp = router
        .oneshot(get("/api/v1/check?platform=ios&appVersion=1.0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "id": V2,
            "forceUpdate": false,
            "fileUrl": "http://example.com/bundle.zip",
            "fileHash": "hash",
            "status": "UPDATE",
        })
    );
}

#[tokio::test]
async fn check_rolls_back_to_embedded_bundle() {
    let store = test_store();
    store
        .append_bundle(&test_bundle(V1, Platform::Ios, "1.0", false))
        .unwrap();
    let router = build_router(store);

    let resp = router
        .oneshot(get(&format!(
            "/api/v1/check?platform=ios&appVersion=2.0&bundleId={V1}"
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "forceUpdate": true,
            "fileUrl": null,
            "fileHash": null,
            "status": "ROLLBACK",
        })
    );
}

#[tokio::test]
async fn check_reports_malformed_ranges_in_header() {
    let store = test_store();
    store
        .append_bundle(&test_bundle(V1, Platform::Android, "what", true))
        .unwrap();
    let router = build_router(store);

    let resp = router
        .oneshot(get("/api/v1/check?platform=android&appVersion=1.0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(WARNINGS_HEADER).unwrap(), "1");
    assert_eq!(body_json(resp).await, Value::Null);
}

#[tokio::test]
async fn check_rejects_bad_input() {
    let router = build_router(test_store());

    let resp = router
        .clone()
        .oneshot(get("/api/v1/check?platform=ios&appVersion=banana"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);

    let resp = router
        .oneshot(get("/api/v1/check?platform=web&appVersion=1.0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn publish_disable_then_check() {
    let router = build_router(test_store());

    let bundle = serde_json::to_value(test_bundle(V1, Platform::Ios, "1.x", true)).unwrap();
    let resp = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/bundles", &bundle))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = router
        .clone()
        .oneshot(get("/api/v1/check?platform=ios&appVersion=1.2.3"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["id"], V1);

    let resp = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/bundles/{V1}"),
            &json!({ "enabled": false }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["enabled"], false);

    let resp = router
        .oneshot(get("/api/v1/check?platform=ios&appVersion=1.2.3"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, Value::Null);
}

#[tokio::test]
async fn publish_rejects_duplicate() {
    let router = build_router(test_store());
    let bundle = serde_json::to_value(test_bundle(V1, Platform::Ios, "1.0", true)).unwrap();

    let resp = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/bundles", &bundle))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = router
        .oneshot(json_request("POST", "/api/v1/bundles", &bundle))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn publish_rejects_malformed_id() {
    let store = test_store();
    let router = build_router(store.clone());
    let mut bundle = serde_json::to_value(test_bundle(V1, Platform::Ios, "1.0", true)).unwrap();
    bundle["id"] = json!("a b");

    let resp = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/bundles", &bundle))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.list_bundles().unwrap().is_empty());

    bundle["id"] = json!(V1);
    let resp = router
        .oneshot(json_request("POST", "/api/v1/bundles", &bundle))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn list_filters_by_platform_and_version() {
    let store = test_store();
    store
        .append_bundle(&test_bundle(V1, Platform::Ios, "1.0", true))
        .unwrap();
    store
        .append_bundle(&test_bundle(V2, Platform::Android, "1.0", true))
        .unwrap();
    store
        .append_bundle(&test_bundle("3", Platform::Ios, "2.x", false))
        .unwrap();
    let router = build_router(store);

    let resp = router.clone().oneshot(get("/api/v1/bundles")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let resp = router
        .clone()
        .oneshot(get("/api/v1/bundles?platform=ios"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["3", V1]);

    let resp = router
        .oneshot(get("/api/v1/bundles?platform=ios&appVersion=2.1"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["enabled"], false);
}

#[tokio::test]
async fn get_bundle_round_trip() {
    let store = test_store();
    store
        .append_bundle(&test_bundle(V1, Platform::Ios, "1.0", true))
        .unwrap();
    let router = build_router(store);

    let resp = router
        .clone()
        .oneshot(get(&format!("/api/v1/bundles/{V1}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["targetVersion"], "1.0");

    let resp = router.oneshot(get("/api/v1/bundles/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
