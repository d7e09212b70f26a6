//! API Handlers
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION, REFERER},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use flashgen_catalog::CatalogListing;
use flashgen_composer::ImageComposer;
use flashgen_core::{
    FirmwareArtifact, FirmwareImageRequest, FlashgenError, FlashingRequest, Soc, Vendor,
    FLASHGEN_VERSION,
};
use flashgen_in::{normalize, RawFlashingFields};
use flashgen_policy::Resolution;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const FLASH_ALERT_HEADER: &str = "x-flash-alert";
pub const DIGEST_HEADER: &str = "x-content-digest";

pub const UNKNOWN_SOC_ALERT: &str = "This SoC does not exist.";
pub const MISSING_FIRMWARE_ALERT: &str = "This firmware does not exist.";
pub const UNSUPPORTED_ALERT: &str = "This flash type is not supported for this SoC.";
pub const INVALID_REQUEST_ALERT: &str = "Invalid flash size, flash type or firmware release.";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": FLASHGEN_VERSION }))
}

pub async fn catalog(State(state): State<AppState>) -> Json<CatalogListing> {
    Json(state.catalog.listing())
}

pub async fn featured(State(state): State<AppState>) -> Json<Vec<Arc<Soc>>> {
    Json(state.catalog.featured())
}

pub async fn full_list(State(state): State<AppState>) -> Json<Vec<Arc<Soc>>> {
    Json(state.catalog.full_list())
}

pub async fn vendor_socs(
    State(state): State<AppState>,
    Path(vendor): Path<String>,
) -> Result<Json<Vec<Arc<Soc>>>, ApiError> {
    let vendor = state.catalog.require_vendor(&vendor)?;
    Ok(Json(state.catalog.socs_for_vendor(&vendor.name)))
}

/// Pre-filled flashing form for a SoC, from query aliases (`mac`, `rom`, ...)
pub async fn prefill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(raw): Query<RawFlashingFields>,
) -> Result<Json<FlashingRequest>, ApiError> {
    let soc = state.catalog.require_soc(&id)?;
    Ok(Json(normalize(&raw, soc)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveBody {
    #[serde(default)]
    pub camera: RawFlashingFields,
}

/// Resolve a submitted form. Both outcomes are 200; only an unknown SoC fails.
pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<Resolution>, ApiError> {
    let resolution = state
        .resolver
        .resolve_soc(&*state.catalog, &id, &body.camera)?;

    state.metrics.record_resolution(resolution.outcome_label());
    tracing::info!(soc = %id, outcome = resolution.outcome_label(), "resolution");

    Ok(Json(resolution))
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    #[serde(default)]
    pub flash_size: String,
    #[serde(default)]
    pub fw_release: String,
    #[serde(default)]
    pub flash_type: String,
}

/// Compose and stream a full flash image
///
/// Every failure the user can act on, an unknown vendor or SoC included,
/// redirects back to the referring page with an `x-flash-alert` message.
pub async fn download_full_image(
    State(state): State<AppState>,
    Path((vendor, id)): Path<(String, String)>,
    Query(params): Query<DownloadParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (vendor, soc) = match locate_soc(&state, &vendor, &id) {
        Ok(found) => found,
        Err(err) => return download_failed(&state, err, &headers),
    };

    let request = FirmwareImageRequest::new(
        soc,
        params.flash_size,
        params.flash_type,
        params.fw_release,
    );

    let composed = match state.resolver.check_image_request(&request, Some(&vendor)) {
        Ok(()) => {
            let composer = state.composer.clone();
            tokio::task::spawn_blocking(move || compose_and_read(&*composer, &request))
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?
        }
        Err(err) => Err(err),
    };

    let (artifact, bytes) = match composed {
        Ok(served) => served,
        Err(err) => return download_failed(&state, err, &headers),
    };

    state.metrics.record_download("ok");
    tracing::info!(
        file = %artifact.filename,
        size = artifact.size,
        digest = %artifact.digest,
        "full image served"
    );

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    Ok((
        [
            (CONTENT_TYPE, artifact.content_type),
            (CONTENT_DISPOSITION, disposition),
            (HeaderName::from_static(DIGEST_HEADER), artifact.digest),
        ],
        bytes,
    )
        .into_response())
}

/// Vendor and SoC for a download; a SoC listed under another vendor is unknown
fn locate_soc(state: &AppState, vendor: &str, id: &str) -> Result<(Arc<Vendor>, Arc<Soc>), FlashgenError> {
    let vendor = state.catalog.require_vendor(vendor)?;
    let soc = state.catalog.require_soc(id)?;
    if soc.vendor.as_deref() != Some(vendor.name.as_str()) {
        return Err(FlashgenError::soc_not_found(id));
    }
    Ok((vendor, soc))
}

/// Generate the image, read it back and remove the file.
///
/// Runs on the blocking pool as one unit so a dropped request cannot leave
/// the artifact behind.
fn compose_and_read(
    composer: &dyn ImageComposer,
    request: &FirmwareImageRequest,
) -> Result<(FirmwareArtifact, Vec<u8>), FlashgenError> {
    let artifact = composer.generate(request)?;
    let bytes = std::fs::read(&artifact.path);

    if let Err(e) = std::fs::remove_file(&artifact.path) {
        tracing::warn!(path = %artifact.path.display(), error = %e, "artifact not removed");
    }

    Ok((artifact, bytes?))
}

/// Same-site path from the Referer header, or `/`
fn redirect_target(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(REFERER)
        .filter(|value| {
            value.to_str().is_ok_and(|referer| {
                referer.starts_with('/') && !referer.starts_with("//") && !referer.contains('\\')
            })
        })
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("/"))
}

fn download_failed(
    state: &AppState,
    err: FlashgenError,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let (result, alert) = match &err {
        FlashgenError::NotFound { .. } => ("not_found", UNKNOWN_SOC_ALERT),
        FlashgenError::MissingComponent { .. } => ("missing_component", MISSING_FIRMWARE_ALERT),
        FlashgenError::UnsupportedCombination(_) => ("unsupported", UNSUPPORTED_ALERT),
        FlashgenError::InvalidImageRequest(_) => ("invalid", INVALID_REQUEST_ALERT),
        _ => {
            state.metrics.record_download("error");
            return Err(err.into());
        }
    };

    tracing::warn!(error = %err, "full image download failed");
    state.metrics.record_download(result);

    Ok((
        StatusCode::SEE_OTHER,
        [
            (LOCATION, redirect_target(headers)),
            (
                HeaderName::from_static(FLASH_ALERT_HEADER),
                HeaderValue::from_static(alert),
            ),
        ],
    )
        .into_response())
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response())
}
