//! Router tests: requests go through the full middleware stack via `oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use flashgen_api::{create_app, AppState};
use flashgen_catalog::InMemoryCatalog;
use flashgen_composer::{ImageComposer, StoreComposer};
use flashgen_core::{
    image_filename, FirmwareArtifact, FirmwareImageRequest, FlashgenError, Result,
    ARTIFACT_CONTENT_TYPE,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

const CATALOG_PATH: &str = "catalog/socs.yaml";
const IMAGE: &[u8] = b"OPENIPC-FULL-IMAGE";

/// Writes a fixed payload, or reports the rootfs as missing
struct FakeComposer {
    dir: PathBuf,
    missing: bool,
}

impl ImageComposer for FakeComposer {
    fn generate(&self, request: &FirmwareImageRequest) -> Result<FirmwareArtifact> {
        if self.missing {
            return Err(FlashgenError::MissingComponent {
                component: "rootfs".to_string(),
                path: self.dir.join(&request.fw_release).join(&request.soc.linux_filename),
            });
        }

        std::fs::create_dir_all(&self.dir)?;
        let filename = image_filename(
            &request.soc.model,
            &request.flash_type,
            &request.fw_release,
            &request.flash_size,
        );
        let path = self.dir.join(&filename);
        std::fs::write(&path, IMAGE)?;

        Ok(FirmwareArtifact {
            path,
            filename,
            content_type: ARTIFACT_CONTENT_TYPE.to_string(),
            size: IMAGE.len() as u64,
            digest: "blake3:fake".to_string(),
            generated_at: chrono::Utc::now(),
        })
    }
}

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("flashgen-api-{}", uuid::Uuid::new_v4()))
}

fn app_with_composer(composer: Arc<dyn ImageComposer>) -> Router {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    let catalog = InMemoryCatalog::load(workspace_root.join(CATALOG_PATH)).unwrap();

    create_app(AppState::new(Arc::new(catalog), composer).unwrap())
}

fn app_with(missing: bool) -> Router {
    app_with_composer(Arc::new(FakeComposer {
        dir: scratch_dir(),
        missing,
    }))
}

fn app() -> Router {
    app_with(false)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    (status, headers, body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app(), "/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], flashgen_core::FLASHGEN_VERSION);
}

#[tokio::test]
async fn test_catalog_listing() {
    let (status, body) = get_json(app(), "/v1/catalog").await;
    assert_eq!(status, StatusCode::OK);

    let vendors: Vec<&str> = body["vendors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(vendors, vec!["Goke", "Hisilicon", "Ingenic", "SigmaStar"]);

    let first = &body["vendors"][0]["socs"][0];
    assert_eq!(first["model"], "GK7205V200");
    assert!(first["rootfs"].as_str().unwrap().starts_with("rootfs.squashfs"));
}

#[tokio::test]
async fn test_featured_and_full_list() {
    let (_, featured) = get_json(app(), "/v1/socs/featured").await;
    let featured = featured.as_array().unwrap();
    assert!(!featured.is_empty());
    assert!(featured.iter().all(|soc| soc["featured"] == true));

    let (_, full) = get_json(app(), "/v1/socs/full-list").await;
    assert!(full.as_array().unwrap().len() > featured.len());
}

#[tokio::test]
async fn test_vendor_socs() {
    let (status, body) = get_json(app(), "/v1/vendors/SigmaStar/socs").await;
    assert_eq!(status, StatusCode::OK);
    let models: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|soc| soc["model"].as_str().unwrap())
        .collect();
    assert_eq!(models, vec!["SSC335", "SSC338Q"]);

    let (status, body) = get_json(app(), "/v1/vendors/Acme/socs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("NOT_FOUND/vendor"));
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn test_prefill_from_query_aliases() {
    let (status, body) = get_json(
        app(),
        "/v1/socs/GK7205V300?mac=AA-BB-CC-DD-EE-FF&rom=nor32m&ver=ultimate",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["camera_mac_address"], "aa:bb:cc:dd:ee:ff");
    assert_eq!(body["flash_type"], "nor32m");
    assert_eq!(body["flash_command"], "nor16m");
    assert_eq!(body["firmware_version"], "ultimate");
    assert_eq!(body["camera_ip_address"], "192.168.1.10");
}

#[tokio::test]
async fn test_resolve_downgrade() {
    let (status, body) = post_json(
        app(),
        "/v1/socs/HI3516EV200",
        json!({ "camera": { "flash_type": "nor8m", "firmware_version": "ultimate" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "configured");
    assert_eq!(body["quirk"], "none");
    assert_eq!(body["request"]["firmware_version"], "lite");
    assert_eq!(body["backup_filename"], "backup-hi3516ev200-nor8m.bin");
    assert!(!body["warning"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_terminal_quirk_is_ok() {
    let (status, body) = post_json(
        app(),
        "/v1/socs/SSC338Q",
        json!({ "camera": { "flash_type": "nand" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unsupported");
    assert_eq!(body["quirk"], "sigmastar_nand_unsupported");
}

#[tokio::test]
async fn test_resolve_unknown_soc() {
    let (status, body) = post_json(app(), "/v1/socs/HI9999ZZ", json!({ "camera": {} })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND/soc 'HI9999ZZ'");
}

// =============================================================================
// Downloads
// =============================================================================

#[tokio::test]
async fn test_download_full_image() {
    let (status, headers, body) = get(
        app(),
        "/v1/vendors/Ingenic/socs/T31X/download_full_image?flash_size=8&fw_release=lite&flash_type=nor8m",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, IMAGE);
    assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"openipc-t31x-nor8m-lite-8.bin\""
    );
    assert!(headers.contains_key("x-content-digest"));
}

#[tokio::test]
async fn test_download_missing_component_redirects() {
    let response = app_with(true)
        .oneshot(
            Request::builder()
                .uri("/v1/vendors/Ingenic/socs/T31X/download_full_image?flash_size=8&fw_release=lite&flash_type=nor8m")
                .header(header::REFERER, "/socs/T31X")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/socs/T31X");
    assert_eq!(response.headers()["x-flash-alert"], "This firmware does not exist.");
}

#[tokio::test]
async fn test_download_unsupported_redirects_home() {
    let (status, headers, _) = get(
        app(),
        "/v1/vendors/Hisilicon/socs/HI3536DV100/download_full_image?flash_size=16&fw_release=lite&flash_type=nor16m",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
    assert!(headers.contains_key("x-flash-alert"));
}

#[tokio::test]
async fn test_download_sigmastar_nand_redirects() {
    let (status, headers, _) = get(
        app(),
        "/v1/vendors/SigmaStar/socs/SSC338Q/download_full_image?flash_size=128&fw_release=lite&flash_type=nand",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
    assert_eq!(
        headers["x-flash-alert"],
        flashgen_api::handlers::UNSUPPORTED_ALERT
    );
}

#[tokio::test]
async fn test_download_foreign_referer_redirects_home() {
    for referer in ["https://evil.example/", "//evil.example/phish"] {
        let response = app_with(true)
            .oneshot(
                Request::builder()
                    .uri("/v1/vendors/Ingenic/socs/T31X/download_full_image?flash_size=8&fw_release=lite&flash_type=nor8m")
                    .header(header::REFERER, referer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/", "Failed for: {}", referer);
    }
}

#[tokio::test]
async fn test_download_unknown_soc_redirects() {
    for uri in [
        // Unknown SoC
        "/v1/vendors/Ingenic/socs/T99/download_full_image?flash_size=8&fw_release=lite&flash_type=nor8m",
        // Unknown vendor
        "/v1/vendors/Acme/socs/T31X/download_full_image?flash_size=8&fw_release=lite&flash_type=nor8m",
        // SoC exists but belongs to another vendor
        "/v1/vendors/Goke/socs/T31X/download_full_image?flash_size=8&fw_release=lite&flash_type=nor8m",
    ] {
        let (status, headers, _) = get(app(), uri).await;

        assert_eq!(status, StatusCode::SEE_OTHER, "Failed for: {}", uri);
        assert_eq!(headers[header::LOCATION], "/");
        assert_eq!(headers["x-flash-alert"], "This SoC does not exist.");
    }
}

#[tokio::test]
async fn test_download_leaves_no_files() {
    let root = scratch_dir();
    let release = root.join("store").join("lite");
    std::fs::create_dir_all(&release).unwrap();
    std::fs::write(release.join("u-boot-t31x-universal.bin"), [0x11; 64]).unwrap();
    std::fs::write(release.join("uImage.t31"), [0x22; 64]).unwrap();
    std::fs::write(release.join("rootfs.squashfs.t31"), [0x33; 64]).unwrap();

    let output = root.join("out");
    let app = app_with_composer(Arc::new(StoreComposer::new(root.join("store"), &output)));

    // Padded sizes name the same image
    for size in ["8", "%208", "%20%208"] {
        let uri = format!(
            "/v1/vendors/Ingenic/socs/T31X/download_full_image?flash_size={}&fw_release=lite&flash_type=nor8m",
            size
        );
        let (status, headers, body) = get(app.clone(), &uri).await;

        assert_eq!(status, StatusCode::OK, "Failed for: {}", size);
        assert_eq!(body.len(), 8 * 1024 * 1024);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"openipc-t31x-nor8m-lite-8m.bin\""
        );
    }

    assert_eq!(std::fs::read_dir(&output).unwrap().count(), 0);
    let _ = std::fs::remove_dir_all(&root);
}

// =============================================================================
// Ambient
// =============================================================================

#[tokio::test]
async fn test_metrics_count_resolutions() {
    let app = app();
    let _ = post_json(
        app.clone(),
        "/v1/socs/HI3516EV200",
        json!({ "camera": { "flash_type": "nor8m", "firmware_version": "ultimate" } }),
    )
    .await;

    let (status, _, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("flashgen_resolutions_total{outcome=\"corrected\"} 1"));
}

#[tokio::test]
async fn test_request_id_echoed() {
    let (_, headers, _) = get(app(), "/v1/health").await;
    assert!(headers.contains_key("x-request-id"));

    let response = app()
        .oneshot(
            Request::builder()
                .uri("/v1/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
