use axum::extract::{FromRequestParts, Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::AdminSession;
use crate::state::SharedState;

/// Requires an admin session for event writes when `protect_api` is on.
/// Reads always pass.
pub async fn protect_writes(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Response {
    let is_read = matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS);
    if !state.config.protect_api || is_read {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();
    match AdminSession::from_request_parts(&mut parts, &state).await {
        Ok(session) => {
            tracing::debug!(admin = %session.principal().id, "Authorized API write");
            next.run(Request::from_parts(parts, body)).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
