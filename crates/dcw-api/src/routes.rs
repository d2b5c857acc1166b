use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
};
use serde_json::{Value, json};

use crate::middleware::{require_admin, require_session, require_student};
use crate::state::AppState;
use crate::{admin, auth, complaints, files, notifications};

/// All HTTP routes. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/admin/login", post(auth::admin_login))
        .route("/complaints/{id}/status", get(complaints::complaint_status));

    let student_routes = Router::new()
        .route("/complaints", post(complaints::submit_complaint))
        .route("/complaints/mine", get(complaints::my_complaints))
        .route("/notifications", get(notifications::get_notifications))
        .layer(middleware::from_fn_with_state(state.clone(), require_student));

    let admin_routes = Router::new()
        .route("/admin/complaints", get(admin::list_complaints))
        .route("/admin/complaints/{id}", patch(admin::update_status))
        .route("/admin/stats", get(admin::stats))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let session_routes = Router::new()
        .route("/complaints/{id}/attachment", get(files::download_attachment))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(student_routes)
        .merge(admin_routes)
        .merge(session_routes)
        // Attachments have no size cap
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
