use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use dcw_types::api::Claims;
use dcw_types::models::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Any signed-in session, student or admin.
pub async fn require_session(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, &[Role::Student, Role::Admin]).await
}

pub async fn require_student(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, &[Role::Student]).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, &[Role::Admin]).await
}

/// Extract and validate the bearer JWT, check its role, and hand the claims
/// to the handler as an extension.
async fn authorize(
    state: &AppState,
    mut req: Request,
    next: Next,
    allowed: &[Role],
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?
    .claims;

    if !allowed.contains(&claims.role) {
        return Err(ApiError::Forbidden("not permitted for this role".into()));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
