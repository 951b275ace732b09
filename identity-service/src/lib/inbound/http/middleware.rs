use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::DateTime;
use chrono::Utc;

use super::handlers::ApiError;
use super::handlers::UNAUTHENTICATED_MESSAGE;
use crate::domain::identity::ports::AuthenticationServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub email: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Middleware that validates bearer tokens and adds the identity to request extensions.
///
/// Every failure produces the same 401; the reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req).ok_or_else(|| {
        tracing::warn!(reason = "missing_bearer", "Request rejected: no bearer token");
        unauthenticated()
    })?;

    let claims = state.auth_service.validate_token(token).map_err(|e| {
        tracing::warn!(reason = token_error_kind(&e), "Request rejected: invalid token");
        unauthenticated()
    })?;

    req.extensions_mut().insert(AuthenticatedIdentity {
        email: claims.subject().to_string(),
        issued_at: claims.issued_at(),
        expires_at: claims.expires_at(),
    });

    Ok(next.run(req).await)
}

fn unauthenticated() -> ApiError {
    ApiError::Unauthorized(UNAUTHENTICATED_MESSAGE.to_string())
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn token_error_kind(err: &auth::TokenError) -> &'static str {
    match err {
        auth::TokenError::Malformed(_) => "malformed",
        auth::TokenError::SignatureInvalid => "signature_invalid",
        auth::TokenError::Expired => "expired",
        auth::TokenError::EncodingFailed(_) => "encoding_failed",
    }
}
