use askama::Template;
use axum::extract::{Form, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::Credentials;
use crate::auth::session::{clear_session_cookie, issue_token, principal_from_jar, session_cookie};
use crate::error::AppError;
use crate::query::QueryParams;
use crate::state::SharedState;
use crate::views::render;

pub const LOGIN_FAILED: &str = "Invalid username or password.";
const DEFAULT_CALLBACK: &str = "/admin";

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: String,
    username: String,
    callback_url: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Only same-site relative paths are followed after login. Control
/// characters and backslashes are refused anywhere in the path.
pub fn safe_callback(raw: Option<&str>) -> String {
    match raw {
        Some(url)
            if url.starts_with('/')
                && !url.starts_with("//")
                && !url.chars().any(|c| c.is_control() || c == '\\') =>
        {
            url.to_string()
        }
        _ => DEFAULT_CALLBACK.to_string(),
    }
}

pub async fn login_page(
    State(state): State<SharedState>,
    jar: CookieJar,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let query = QueryParams::parse(raw.as_deref());
    let callback_url = safe_callback(query.get("callbackUrl"));

    if principal_from_jar(&jar, &state.config.session_secret).is_some() {
        return Ok(Redirect::to(&callback_url).into_response());
    }

    let template = LoginTemplate {
        error: String::new(),
        username: String::new(),
        callback_url,
    };
    Ok(render(&template)?.into_response())
}

pub async fn login(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let callback_url = safe_callback(form.callback_url.as_deref());
    let credentials = Credentials {
        username: form.username,
        password: form.password,
    };

    let Some(principal) = state.gate.authorize(Some(&credentials)) else {
        tracing::warn!("Rejected admin login");
        let template = LoginTemplate {
            error: LOGIN_FAILED.to_string(),
            username: credentials.username.unwrap_or_default(),
            callback_url,
        };
        return Ok((StatusCode::UNAUTHORIZED, render(&template)?).into_response());
    };

    let token = issue_token(&principal, &state.config).map_err(AppError::Internal)?;
    tracing::info!(admin = %principal.id, "Admin signed in");

    let jar = jar.add(session_cookie(&token, &state.config));
    Ok((jar, Redirect::to(&callback_url)).into_response())
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(clear_session_cookie()), Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_callbacks_are_kept() {
        assert_eq!(safe_callback(Some("/admin?page=2")), "/admin?page=2");
        assert_eq!(safe_callback(Some("/admin/new")), "/admin/new");
    }

    #[test]
    fn foreign_callbacks_fall_back_to_admin() {
        assert_eq!(safe_callback(None), "/admin");
        assert_eq!(safe_callback(Some("")), "/admin");
        assert_eq!(safe_callback(Some("https://evil.example")), "/admin");
        assert_eq!(safe_callback(Some("//evil.example")), "/admin");
        assert_eq!(safe_callback(Some("/\\evil.example")), "/admin");
        assert_eq!(safe_callback(Some("/\t/evil.example")), "/admin");
        assert_eq!(safe_callback(Some("/\n/evil.example")), "/admin");
        assert_eq!(safe_callback(Some("/\r\n/evil.example")), "/admin");
        assert_eq!(safe_callback(Some("/admin\\..\\evil")), "/admin");
    }
}
