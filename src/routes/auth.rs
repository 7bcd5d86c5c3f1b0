use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};

use crate::auth::session::{clear_session_cookie, issue_token, session_cookie};
use crate::auth::{AdminSession, Credentials};
use crate::error::AppError;
use crate::routes::events::INVALID_JSON_BODY;
use crate::state::SharedState;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub async fn login(
    State(state): State<SharedState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let credentials: Credentials = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest(INVALID_JSON_BODY.to_string()))?;

    let Some(principal) = state.gate.authorize(Some(&credentials)) else {
        tracing::warn!("Rejected admin login");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let token = issue_token(&principal, &state.config).map_err(AppError::Internal)?;
    tracing::info!(admin = %principal.id, "Admin signed in");

    let jar = jar.add(session_cookie(&token, &state.config));
    Ok((jar, Json(json!({ "user": principal }))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    (jar.add(clear_session_cookie()), Json(json!({ "ok": true })))
}

pub async fn session(AdminSession(principal): AdminSession) -> Json<Value> {
    Json(json!({ "user": principal }))
}
