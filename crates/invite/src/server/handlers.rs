//! Request handlers for the RSVP resource.
//!
//! Bodies are taken as raw bytes and parsed here, so a request with a
//! missing or unexpected `Content-Type` is judged on its content alone.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{ApiError, Operation};
use super::AppState;
use crate::api::{
    DeleteRequest, DeleteResponse, ListResponse, SubmitRequest, SubmitResponse, INVALID_INDEX,
    NOT_FOUND, SUBMITTED,
};
use crate::model::NewRsvp;

/// `GET`: every RSVP, newest first.
///
/// # Errors
///
/// Returns a 500 if the store cannot be read.
pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    let responses = state
        .store
        .list()
        .await
        .map_err(|e| ApiError::from_store(Operation::Fetch, e))?;

    debug!("Listing {} RSVPs", responses.len());
    Ok(Json(ListResponse { responses }))
}

/// `POST`: store a new RSVP and notify the host.
///
/// # Errors
///
/// Returns a 400 for missing or invalid fields and a 500 if the store
/// rejects the write.
pub async fn submit(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let request: SubmitRequest = serde_json::from_slice(&body).unwrap_or_default();

    let submission = NewRsvp::from_fields(request.name.as_deref(), request.attending.as_deref())
        .map_err(|e| ApiError::from_store(Operation::Submit, e))?;

    let stored = state
        .store
        .append(submission)
        .await
        .map_err(|e| ApiError::from_store(Operation::Submit, e))?;

    info!(
        id = %stored.id,
        attending = %stored.attending,
        "RSVP received from {}",
        stored.name
    );

    if let Err(e) = state.notifier.notify(&stored).await {
        warn!(id = %stored.id, "RSVP notification failed: {e}");
    }

    Ok(Json(SubmitResponse {
        success: true,
        message: SUBMITTED.to_string(),
        response: stored,
    }))
}

/// `DELETE`: remove one RSVP by `id`, or by `index` in the newest-first
/// listing.
///
/// # Errors
///
/// Returns a 400 for an unusable index or unknown id and a 500 if the store
/// fails.
pub async fn remove(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DeleteResponse>, ApiError> {
    let request: DeleteRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest(INVALID_INDEX.to_string()))?;

    let result = match (request.id, request.index) {
        (Some(id), _) => {
            let id = Uuid::parse_str(id.trim())
                .map_err(|_| ApiError::BadRequest(NOT_FOUND.to_string()))?;
            state.store.remove(id).await
        }
        (None, Some(index)) => state.store.remove_at(index).await,
        (None, None) => return Err(ApiError::BadRequest(INVALID_INDEX.to_string())),
    };

    let removed = result.map_err(|e| ApiError::from_store(Operation::Delete, e))?;

    info!(id = %removed.id, "Deleted RSVP for {}", removed.name);
    Ok(Json(DeleteResponse::for_removed(&removed)))
}

/// Any other method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
