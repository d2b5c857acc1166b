use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use dcw_store::{NewAttachment, NewComplaint, parse_choice};
use dcw_types::api::{Claims, ComplaintStatusView, ComplaintView, SubmitComplaintRequest};
use dcw_types::models::ComplaintId;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /complaints: file a complaint. Nothing is sent to anyone yet.
pub async fn submit_complaint(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitComplaintRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = parse_choice("category", &req.category)?;
    let priority = parse_choice("priority", &req.priority)?;

    let attachment = match req.attachment {
        Some(upload) => Some(NewAttachment {
            data: B64
                .decode(upload.data.as_bytes())
                .map_err(|_| ApiError::Validation("attachment data is not valid base64".into()))?,
            file_name: upload.file_name,
            content_type: upload.content_type,
        }),
        None => None,
    };

    let id = state.store.submit(NewComplaint {
        name: req.name,
        submitter_id: req.submitter_id,
        category,
        priority,
        details: req.details,
        attachment,
        submitted_by: claims.sub,
    })?;

    let complaint = state.store.get(id)?;
    Ok((StatusCode::CREATED, Json(ComplaintView::from(&complaint))))
}

/// GET /complaints/mine: everything filed from the caller's account.
pub async fn my_complaints(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<Vec<ComplaintView>> {
    let complaints = state.store.list_submitted_by(&claims.sub);
    Json(complaints.iter().map(ComplaintView::from).collect())
}

/// GET /complaints/{id}/status: public lookup by complaint number.
pub async fn complaint_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ComplaintStatusView>, ApiError> {
    let complaint = state.store.get(ComplaintId(id))?;
    Ok(Json(ComplaintStatusView::from(&complaint)))
}
