use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// The two configured admin values. Either may be absent, in which case
/// nobody can sign in.
#[derive(Debug, Clone, Default)]
pub struct AdminCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Values supplied by a login attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPrincipal {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl AdminPrincipal {
    pub fn admin() -> Self {
        Self {
            id: "admin".to_string(),
            name: "Admin".to_string(),
            role: Role::Admin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    credentials: AdminCredentials,
}

impl AdminGate {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self { credentials }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.username.is_some() && self.credentials.password.is_some()
    }

    /// Single equality check against the configured pair. Any missing value,
    /// supplied or configured, is a mismatch.
    pub fn authorize(&self, supplied: Option<&Credentials>) -> Option<AdminPrincipal> {
        let supplied = supplied?;
        let (Some(expected_user), Some(expected_pass)) =
            (&self.credentials.username, &self.credentials.password)
        else {
            return None;
        };
        let (Some(user), Some(pass)) = (&supplied.username, &supplied.password) else {
            return None;
        };

        let matches = user.as_bytes().ct_eq(expected_user.as_bytes())
            & pass.as_bytes().ct_eq(expected_pass.as_bytes());

        bool::from(matches).then(AdminPrincipal::admin)
    }
}
