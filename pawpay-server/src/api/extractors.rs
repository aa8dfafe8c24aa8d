//! Custom Axum extractors for request authentication.
//!
//! Provides:
//! - `AdminAuth` — verifies the `Pawpay-Admin-Authorization` header against the
//!   stored argon2 hash of the admin secret (used by the Admin API).

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use pawpay_sdk::signature::ADMIN_AUTH_HEADER;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// AdminAuth — Admin API authentication via the admin secret header
// ---------------------------------------------------------------------------

/// An Axum extractor that verifies the `Pawpay-Admin-Authorization` header.
///
/// # Header format
///
/// ```text
/// Pawpay-Admin-Authorization: {plaintext_admin_secret}
/// ```
///
/// The presented secret is verified against the argon2 hash loaded from
/// the config file.
pub struct AdminAuth;

/// Errors returned by the [`AdminAuth`] extractor.
#[derive(Debug)]
pub enum AdminAuthError {
    MissingHeader,
    InvalidHeader,
    InvalidSecret,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AdminAuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "missing Pawpay-Admin-Authorization header",
            ),
            AdminAuthError::InvalidHeader => (StatusCode::BAD_REQUEST, "invalid header format"),
            AdminAuthError::InvalidSecret => {
                (StatusCode::UNAUTHORIZED, "admin secret verification failed")
            }
        };
        (status, message).into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidHeader)?;

        let admin = state.config.admin.read().await;
        if !admin.verify(presented) {
            drop(admin);
            return Err(AdminAuthError::InvalidSecret);
        }

        drop(admin);
        Ok(AdminAuth)
    }
}
