//! Medication request endpoints
//!
//! All three operations are nested under the owning patient:
//! - POST  /patients/{patient_id}/medication-requests
//! - GET   /patients/{patient_id}/medication-requests
//! - PATCH /patients/{patient_id}/medication-requests/{request_id}

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};

use medreq_core::{
    CreateMedicationRequest, MedicationRequestDetail, MedicationRequestPatch, RequestFilter,
    RequestService,
};

use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidPath, ValidQuery};
use crate::state::AppState;

/// POST /patients/{patient_id}/medication-requests - create a request
async fn create_request(
    State(state): State<AppState>,
    ValidPath(patient_id): ValidPath<i64>,
    ValidJson(payload): ValidJson<CreateMedicationRequest>,
) -> Result<Json<MedicationRequestDetail>, ApiError> {
    let created = RequestService::new(state.store())
        .create(patient_id, payload)
        .await?;
    Ok(Json(created))
}

/// GET /patients/{patient_id}/medication-requests - list with optional filters
async fn list_requests(
    State(state): State<AppState>,
    ValidPath(patient_id): ValidPath<i64>,
    ValidQuery(filter): ValidQuery<RequestFilter>,
) -> Result<Json<Vec<MedicationRequestDetail>>, ApiError> {
    let requests = RequestService::new(state.store())
        .list(patient_id, &filter)
        .await?;
    Ok(Json(requests))
}

/// PATCH /patients/{patient_id}/medication-requests/{request_id} - partial update
async fn update_request(
    State(state): State<AppState>,
    ValidPath((patient_id, request_id)): ValidPath<(i64, i64)>,
    ValidJson(patch): ValidJson<MedicationRequestPatch>,
) -> Result<Json<MedicationRequestDetail>, ApiError> {
    let updated = RequestService::new(state.store())
        .update(patient_id, request_id, &patch)
        .await?;
    Ok(Json(updated))
}

/// Medication request routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/patients/{patient_id}/medication-requests",
            get(list_requests).post(create_request),
        )
        .route(
            "/patients/{patient_id}/medication-requests/{request_id}",
            patch(update_request),
        )
}
