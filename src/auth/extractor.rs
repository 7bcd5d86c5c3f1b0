use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::gate::AdminPrincipal;
use crate::auth::jwt;
use crate::auth::session::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::SharedState;

pub const AUTH_REQUIRED: &str = "Authentication required";

/// A signed-in admin, taken from a Bearer token or the session cookie.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminPrincipal);

impl AdminSession {
    pub fn principal(&self) -> &AdminPrincipal {
        &self.0
    }
}

impl FromRequestParts<SharedState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let secret = &state.config.session_secret;

        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let claims = jwt::decode_token(token, secret)
                    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
                return Ok(AdminSession(claims.principal()));
            }
        }

        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            let claims = jwt::decode_token(cookie.value(), secret)
                .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
            return Ok(AdminSession(claims.principal()));
        }

        Err(AppError::Unauthorized(AUTH_REQUIRED.to_string()))
    }
}
