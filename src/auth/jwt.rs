use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::auth::gate::{AdminPrincipal, Role};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: i64,
}

impl Claims {
    pub fn new(principal: &AdminPrincipal, ttl_minutes: i64) -> Self {
        Self {
            sub: principal.id.clone(),
            name: principal.name.clone(),
            role: principal.role,
            exp: (Utc::now() + Duration::minutes(ttl_minutes)).timestamp(),
        }
    }

    pub fn principal(&self) -> AdminPrincipal {
        AdminPrincipal {
            id: self.sub.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}
