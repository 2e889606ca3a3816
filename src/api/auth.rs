use axum::{
    Form, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{Account, Credentials, Registration};

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests whose `Authorization: Bearer <token>` header does not
/// name a stored token.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let header = authorization_header(&headers);

    if state.session_verifier().validate_token(header).await {
        return Ok(next.run(request).await);
    }

    Err(ApiError::unauthorized("Invalid token"))
}

/// The raw `Authorization` header, empty when absent or not valid UTF-8.
fn authorization_header(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
/// Create an account from a form submission; the response carries its first token
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(registration): Form<Registration>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state.account_service().register(registration).await?;
    tracing::Span::current().record("user_id", account.id);
    Ok(Json(ApiResponse::success(account)))
}

/// POST /login
/// Verify username and password, rotate and return the bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    // An unreadable body is handled like an empty one so the client gets
    // the usual field-level validation messages.
    let credentials = match payload {
        Ok(Json(credentials)) => credentials,
        Err(rejection) => {
            tracing::warn!("Unreadable login payload: {rejection}");
            Credentials::default()
        }
    };

    let account = state.session_verifier().login(credentials).await?;
    tracing::Span::current().record("user_id", account.id);
    Ok(Json(ApiResponse::success(account)))
}

/// GET /user
/// Resolve the bearer token in the `Authorization` header to its account
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let header = authorization_header(&headers);
    let account = state.session_verifier().lookup_by_token(header).await?;

    tracing::Span::current().record("user_id", account.id);

    Ok(Json(ApiResponse::success(account)))
}
