use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::models::{EventChanges, NewEvent};
use crate::validation::{ValidationError, ValidationIssue};

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 2000;
pub const CAMPUS_MAX: usize = 200;
pub const CATEGORY_MAX: usize = 200;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Validate a create payload. Every field except `isPublished` is required.
pub fn validate_create(body: &Value) -> Result<NewEvent, ValidationError> {
    let mut reader = PayloadReader::new(body)?;

    let title = reader.text("title", TITLE_MAX, true);
    let description = reader.text("description", DESCRIPTION_MAX, true);
    let campus = reader.text("campus", CAMPUS_MAX, true);
    let category = reader.text("category", CATEGORY_MAX, true);
    let start = reader.datetime("startDateTime", true);
    let end = reader.datetime("endDateTime", true);
    let cost = reader.cost("cost", true);
    let is_published = reader.flag("isPublished", false);

    reader.check_window(start, end);

    match (title, description, campus, category, start, end, cost) {
        (
            Some(title),
            Some(description),
            Some(campus),
            Some(category),
            Some(start_date_time),
            Some(end_date_time),
            Some(cost),
        ) if reader.issues.is_empty() => Ok(NewEvent {
            title,
            description,
            campus,
            category,
            start_date_time,
            end_date_time,
            cost,
            is_published: is_published.unwrap_or(false),
        }),
        _ => Err(ValidationError::failed(reader.issues)),
    }
}

/// Validate a partial update. The window check only applies when both dates
/// are part of the same payload.
pub fn validate_update(body: &Value) -> Result<EventChanges, ValidationError> {
    let mut reader = PayloadReader::new(body)?;

    let changes = EventChanges {
        title: reader.text("title", TITLE_MAX, false),
        description: reader.text("description", DESCRIPTION_MAX, false),
        campus: reader.text("campus", CAMPUS_MAX, false),
        category: reader.text("category", CATEGORY_MAX, false),
        start_date_time: reader.datetime("startDateTime", false),
        end_date_time: reader.datetime("endDateTime", false),
        cost: reader.cost("cost", false),
        is_published: reader.flag("isPublished", false),
    };

    reader.check_window(changes.start_date_time, changes.end_date_time);

    if reader.issues.is_empty() {
        Ok(changes)
    } else {
        Err(ValidationError::failed(reader.issues))
    }
}

/// Walks a JSON object field by field, collecting every issue instead of
/// stopping at the first one.
struct PayloadReader<'a> {
    object: &'a Map<String, Value>,
    issues: Vec<ValidationIssue>,
}

impl<'a> PayloadReader<'a> {
    fn new(body: &'a Value) -> Result<Self, ValidationError> {
        match body.as_object() {
            Some(object) => Ok(Self {
                object,
                issues: Vec::new(),
            }),
            None => Err(ValidationError::failed(vec![ValidationIssue::new(
                "body",
                "must be a JSON object",
            )])),
        }
    }

    fn issue(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    fn field(&mut self, key: &str, required: bool) -> Option<&'a Value> {
        let object = self.object;
        match object.get(key) {
            None => {
                if required {
                    self.issue(key, "is required");
                }
                None
            }
            Some(Value::Null) => {
                self.issue(key, "must not be null");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn text(&mut self, key: &str, max: usize, required: bool) -> Option<String> {
        let value = self.field(key, required)?;
        let Some(s) = value.as_str() else {
            self.issue(key, "must be a string");
            return None;
        };
        if s.is_empty() {
            self.issue(key, "must be non-empty");
            return None;
        }
        if s.chars().count() > max {
            self.issue(key, format!("must be at most {max} characters"));
            return None;
        }
        Some(s.to_string())
    }

    fn datetime(&mut self, key: &str, required: bool) -> Option<NaiveDateTime> {
        let value = self.field(key, required)?;
        let parsed = coerce_datetime(value);
        if parsed.is_none() {
            self.issue(key, "must be a valid date");
        }
        parsed
    }

    fn cost(&mut self, key: &str, required: bool) -> Option<i32> {
        let value = self.field(key, required)?;
        let Some(n) = coerce_number(value) else {
            self.issue(key, "must be a number");
            return None;
        };
        if n < 0.0 {
            self.issue(key, "must be greater than or equal to 0");
            return None;
        }
        if n.fract() != 0.0 {
            self.issue(key, "must be a whole number");
            return None;
        }
        if n > f64::from(i32::MAX) {
            self.issue(key, format!("must be at most {}", i32::MAX));
            return None;
        }
        Some(n as i32)
    }

    fn flag(&mut self, key: &str, required: bool) -> Option<bool> {
        let value = self.field(key, required)?;
        let flag = value.as_bool();
        if flag.is_none() {
            self.issue(key, "must be a boolean");
        }
        flag
    }

    fn check_window(&mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                self.issue("endDateTime", "endDateTime must be after startDateTime");
            }
        }
    }
}

/// Date-like input: ISO strings (with or without offset, date-only, or the
/// `datetime-local` form value) or epoch milliseconds.
pub fn coerce_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_datetime(s.trim()),
        Value::Number(n) => n
            .as_f64()
            .filter(|ms| ms.is_finite())
            .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Numeric-like input: JSON numbers, or strings that parse as a finite number.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}
