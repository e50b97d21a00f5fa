use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{ETAG, IF_MATCH};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use audithub_store::{
    AuditSummary, Checklist, FeatureId, ListingDiagnostic, ResultsPayload, Revision,
};

use crate::AppState;
use crate::error::ApiError;

pub(crate) async fn list_audits(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuditSummary>>, ApiError> {
    let listing = state.store.list_audits()?;
    Ok(Json(listing.audits))
}

pub(crate) async fn diagnostics(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListingDiagnostic>>, ApiError> {
    let listing = state.store.list_audits()?;
    Ok(Json(listing.diagnostics))
}

pub(crate) async fn audit_summary(
    State(state): State<AppState>,
    Path(feature): Path<String>,
) -> Result<Json<AuditSummary>, ApiError> {
    let feature = FeatureId::parse(&feature)?;
    Ok(Json(state.store.summary(&feature)?))
}

pub(crate) async fn checklist(
    State(state): State<AppState>,
    Path(feature): Path<String>,
) -> Result<Json<Checklist>, ApiError> {
    let feature = FeatureId::parse(&feature)?;
    Ok(Json(state.store.get_checklist(&feature)?))
}

pub(crate) async fn results(
    State(state): State<AppState>,
    Path(feature): Path<String>,
) -> Result<Response, ApiError> {
    let feature = FeatureId::parse(&feature)?;
    let loaded = state.store.load_results(&feature)?;

    let mut resp = Json(loaded.record).into_response();
    if let Some(revision) = loaded.revision {
        set_etag(&mut resp, &revision);
    }
    Ok(resp)
}

/// Replace the results record. The body is parsed regardless of its
/// `Content-Type`; `If-Match` opts into a revision check.
pub(crate) async fn save_results(
    State(state): State<AppState>,
    Path(feature): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let feature = FeatureId::parse(&feature)?;
    let payload: ResultsPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))?;
    let expected = expected_revision(&headers)?;

    let saved = state
        .store
        .save_results_if(&feature, payload, expected.as_ref())?;

    let mut resp = Json(saved.receipt).into_response();
    set_etag(&mut resp, &saved.revision);
    Ok(resp)
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "dir": state.store.root().as_str() }))
}

pub(crate) async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// `If-Match: *` and an absent header both mean "no precondition".
fn expected_revision(headers: &HeaderMap) -> Result<Option<Revision>, ApiError> {
    let Some(value) = headers.get(IF_MATCH) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid If-Match header"))?;
    if raw.trim() == "*" {
        return Ok(None);
    }
    Revision::from_etag(raw)
        .map(Some)
        .ok_or_else(|| ApiError::bad_request("Invalid If-Match header"))
}

fn set_etag(resp: &mut Response, revision: &Revision) {
    if let Ok(value) = HeaderValue::from_str(&revision.as_etag()) {
        resp.headers_mut().insert(ETAG, value);
    }
}
