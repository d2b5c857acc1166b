use axum::{Extension, Json, extract::State};

use dcw_types::api::{Claims, NotificationsResponse};

use crate::state::AppState;

/// GET /notifications: resolution notices queued for the signed-in student.
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<NotificationsResponse> {
    let notifications = state.store.notifications_for(&claims.sub);
    Json(NotificationsResponse {
        identifier: claims.sub,
        notifications,
    })
}
