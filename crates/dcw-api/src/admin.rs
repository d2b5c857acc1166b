use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::{info, warn};

use dcw_mail::{Email, MailError};
use dcw_store::ResolutionNotice;
use dcw_types::api::{
    ComplaintListResponse, ComplaintView, EmailOutcome, UpdateStatusRequest, UpdateStatusResponse,
};
use dcw_types::filter::{ComplaintFilter, Stats, parse_set};
use dcw_types::models::ComplaintId;

use crate::error::ApiError;
use crate::state::AppState;

/// `?category=WiFi,Hostel&priority=High&status=Pending`. An omitted key is
/// unrestricted; a present but empty key selects nothing.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl FilterQuery {
    pub fn to_filter(&self) -> Result<ComplaintFilter, ApiError> {
        let invalid = |e: dcw_types::models::UnknownVariant| ApiError::Validation(e.to_string());
        Ok(ComplaintFilter {
            categories: self.category.as_deref().map(parse_set).transpose().map_err(invalid)?,
            priorities: self.priority.as_deref().map(parse_set).transpose().map_err(invalid)?,
            statuses: self.status.as_deref().map(parse_set).transpose().map_err(invalid)?,
        })
    }
}

/// GET /admin/complaints: filtered list plus the values available to filter on.
pub async fn list_complaints(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ComplaintListResponse>, ApiError> {
    let filter = query.to_filter()?;
    let complaints = state.store.list(&filter);

    Ok(Json(ComplaintListResponse {
        complaints: complaints.iter().map(ComplaintView::from).collect(),
        facets: state.store.facets(),
    }))
}

/// GET /admin/stats: counts per category, priority and status over the
/// same filtered set the list shows.
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Stats>, ApiError> {
    let filter = query.to_filter()?;
    Ok(Json(state.store.stats(&filter)))
}

/// PATCH /admin/complaints/{id}: change status. A move to `Resolved`
/// queues a notification (inside the store) and then emails the submitter.
/// The email is best-effort: its failure is reported, not propagated. An
/// optional `note` is stored with the complaint and goes into the email.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let change = state
        .store
        .update_status_with_note(ComplaintId(id), req.status, req.note.as_deref())?;

    let (email, warning) = match &change.notice {
        Some(notice) => send_resolution_email(&state, notice).await,
        None => (EmailOutcome::Skipped, None),
    };

    Ok(Json(UpdateStatusResponse {
        changed: change.changed(),
        notified: change.notice.is_some(),
        complaint: ComplaintView::from(&change.complaint),
        email,
        warning,
    }))
}

async fn send_resolution_email(
    state: &AppState,
    notice: &ResolutionNotice,
) -> (EmailOutcome, Option<String>) {
    let email = Email::resolution(&notice.recipient, notice.category, notice.note.as_deref());

    let send = state.mailer.send(&email);
    let result = match tokio::time::timeout(state.mail_timeout, send).await {
        Ok(sent) => sent,
        Err(_) => Err(MailError::Timeout(state.mail_timeout)),
    };

    match result {
        Ok(()) => {
            info!(
                complaint = %notice.complaint_id,
                to = %notice.recipient,
                "Resolution email sent"
            );
            (EmailOutcome::Sent, None)
        }
        Err(e) => {
            warn!(
                complaint = %notice.complaint_id,
                to = %notice.recipient,
                error = %e,
                "Resolution email failed"
            );
            (EmailOutcome::Failed, Some(format!("Email failed: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use dcw_types::models::{Category, Priority, Status};

    #[test]
    fn omitted_keys_are_unrestricted() {
        let filter = FilterQuery::default().to_filter().unwrap();
        assert_eq!(filter, ComplaintFilter::all());
    }

    #[test]
    fn keys_parse_into_sets() {
        let query = FilterQuery {
            category: Some("WiFi,Mess".into()),
            priority: Some("".into()),
            status: Some("Resolved".into()),
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.categories, Some(BTreeSet::from([Category::WiFi, Category::Mess])));
        assert_eq!(filter.priorities, Some(BTreeSet::<Priority>::new()));
        assert_eq!(filter.statuses, Some(BTreeSet::from([Status::Resolved])));
    }

    #[test]
    fn unknown_value_is_a_validation_error() {
        let query = FilterQuery {
            status: Some("Closed".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.to_filter(),
            Err(ApiError::Validation(m)) if m == "unknown status 'Closed'"
        ));
    }
}
