use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::auth::gate::AdminPrincipal;
use crate::auth::jwt::{self, Claims};
use crate::config::Config;

pub const SESSION_COOKIE: &str = "eventdesk_session";

/// Sign a session token for `principal` with the configured lifetime.
pub fn issue_token(principal: &AdminPrincipal, config: &Config) -> Result<String, String> {
    let claims = Claims::new(principal, config.session_ttl_minutes);
    jwt::encode_token(&claims, &config.session_secret)
}

pub fn session_cookie(token: &str, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(config.session_ttl_minutes))
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// Principal carried by a valid session cookie, if any.
pub fn principal_from_jar(jar: &CookieJar, secret: &str) -> Option<AdminPrincipal> {
    let cookie = jar.get(SESSION_COOKIE)?;
    jwt::decode_token(cookie.value(), secret)
        .ok()
        .map(|claims| claims.principal())
}
