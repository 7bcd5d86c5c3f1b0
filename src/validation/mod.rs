//! Request validation.
//!
//! Every payload goes through here before it reaches storage: the result is
//! either a typed value or a [`ValidationError`] listing each violated field.

pub mod event;

use serde::Serialize;
use uuid::Uuid;

pub use event::{validate_create, validate_update};

pub const INVALID_EVENT_ID: &str = "Invalid event id";
pub const VALIDATION_FAILED: &str = "Validation failed";

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn failed(issues: Vec<ValidationIssue>) -> Self {
        Self {
            message: VALIDATION_FAILED.to_string(),
            issues,
        }
    }

    /// Issue message for `field`, if any. Used by the form views.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|i| i.path == field)
            .map(|i| i.message.as_str())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        for issue in &self.issues {
            write!(f, "; {} {}", issue.path, issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accept only the canonical hyphenated UUID form.
pub fn parse_event_id(raw: &str) -> Result<Uuid, ValidationError> {
    let invalid = || ValidationError {
        message: INVALID_EVENT_ID.to_string(),
        issues: vec![ValidationIssue::new("id", "must be a UUID")],
    };

    // 36 chars rules out the simple, braced and urn forms Uuid also accepts
    if raw.len() != 36 {
        return Err(invalid());
    }
    Uuid::try_parse(raw).map_err(|_| invalid())
}
