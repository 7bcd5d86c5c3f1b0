use std::net::IpAddr;

use crate::auth::gate::AdminCredentials;
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PaginationConfig};

/// One year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub host: IpAddr,
    pub port: u16,
    /// Public address, logged at startup. Pages only emit relative links.
    pub base_url: String,
    pub admin: AdminCredentials,
    pub max_body_size: usize,
    pub pagination: PaginationConfig,
    pub session_ttl_minutes: i64,
    pub secure_cookies: bool,
    pub protect_api: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env.required("DATABASE_URL")?;
        let session_secret = env.required("EVENTDESK_SESSION_SECRET")?;

        let host: IpAddr = env
            .or("EVENTDESK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid EVENTDESK_HOST: {e}"))?;

        let port: u16 = env
            .or("EVENTDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid EVENTDESK_PORT: {e}"))?;

        let base_url = env.or("EVENTDESK_BASE_URL", &format!("http://{host}:{port}"));

        let admin = AdminCredentials {
            username: env.non_empty("ADMIN_USERNAME"),
            password: env.non_empty("ADMIN_PASSWORD"),
        };

        let max_body_size: usize = env
            .or("EVENTDESK_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid EVENTDESK_MAX_BODY_SIZE: {e}"))?;

        let default_page_size = env.positive("EVENTDESK_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let max_page_size = env.positive("EVENTDESK_MAX_PAGE_SIZE", MAX_PAGE_SIZE)?;

        let session_ttl_minutes = env.positive("EVENTDESK_SESSION_TTL_MINUTES", 720)?;
        if session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            return Err(format!(
                "Invalid EVENTDESK_SESSION_TTL_MINUTES: must be at most {MAX_SESSION_TTL_MINUTES}, got {session_ttl_minutes}"
            ));
        }

        let secure_cookies = env.flag("EVENTDESK_SECURE_COOKIES", true)?;
        let protect_api = env.flag("EVENTDESK_PROTECT_API", false)?;

        let log_level = env.or("EVENTDESK_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            session_secret,
            host,
            port,
            base_url,
            admin,
            max_body_size,
            pagination: PaginationConfig {
                default_page_size,
                max_page_size,
            },
            session_ttl_minutes,
            secure_cookies,
            protect_api,
            log_level,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, key: &str) -> Result<String, String> {
        (self.0)(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
    }

    fn or(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    fn positive(&self, key: &str, default: i64) -> Result<i64, String> {
        let Some(raw) = (self.0)(key) else {
            return Ok(default);
        };
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            Ok(n) => Err(format!("Invalid {key}: must be at least 1, got {n}")),
            Err(e) => Err(format!("Invalid {key}: {e}")),
        }
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, String> {
        let Some(raw) = (self.0)(key) else {
            return Ok(default);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(format!("Invalid {key}: expected a boolean, got '{other}'")),
        }
    }
}
