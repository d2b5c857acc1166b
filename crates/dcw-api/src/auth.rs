use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};

use dcw_types::api::{
    AdminLoginRequest, Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use dcw_types::models::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Subject used in admin tokens. There is one shared admin secret, not
/// per-admin accounts.
pub const ADMIN_SUBJECT: &str = "admin";

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.register(&req.identifier, &req.secret)?;
    info!(identifier = %req.identifier, "Student signed up");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            identifier: req.identifier,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = state.store.authenticate(&req.identifier, &req.secret) {
        warn!(identifier = %req.identifier, "Student sign-in rejected");
        return Err(e.into());
    }

    let token = create_token(&state, &req.identifier, Role::Student)?;

    Ok(Json(LoginResponse {
        identifier: req.identifier,
        role: Role::Student,
        token,
    }))
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state
        .store
        .hasher()
        .verify(&req.password, &state.admin_secret_hash)
    {
        warn!("Admin sign-in rejected");
        return Err(ApiError::Unauthorized("incorrect admin password".into()));
    }

    let token = create_token(&state, ADMIN_SUBJECT, Role::Admin)?;
    info!("Admin signed in");

    Ok(Json(LoginResponse {
        identifier: ADMIN_SUBJECT.to_string(),
        role: Role::Admin,
        token,
    }))
}

fn create_token(state: &AppState, subject: &str, role: Role) -> Result<String, ApiError> {
    let expires = chrono::Utc::now()
        .checked_add_signed(state.token_ttl)
        .ok_or_else(|| ApiError::Internal("token lifetime out of range".into()))?;
    let claims = Claims {
        sub: subject.to_string(),
        role,
        exp: expires.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
}
