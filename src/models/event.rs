use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub campus: String,
    pub category: String,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub cost: i32,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A fully validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub campus: String,
    pub category: String,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub cost: i32,
    pub is_published: bool,
}

/// A validated partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub campus: Option<String>,
    pub category: Option<String>,
    pub start_date_time: Option<NaiveDateTime>,
    pub end_date_time: Option<NaiveDateTime>,
    pub cost: Option<i32>,
    pub is_published: Option<bool>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self == &EventChanges::default()
    }

    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(campus) = &self.campus {
            event.campus = campus.clone();
        }
        if let Some(category) = &self.category {
            event.category = category.clone();
        }
        if let Some(start) = self.start_date_time {
            event.start_date_time = start;
        }
        if let Some(end) = self.end_date_time {
            event.end_date_time = end;
        }
        if let Some(cost) = self.cost {
            event.cost = cost;
        }
        if let Some(published) = self.is_published {
            event.is_published = published;
        }
    }
}

/// Exact-match filters for the unpaginated listing.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub campus: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(campus) = &self.campus {
            if &event.campus != campus {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &event.category != category {
                return false;
            }
        }
        if let Some(published) = self.published {
            if event.is_published != published {
                return false;
            }
        }
        true
    }
}

/// Which rows a paginated listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Admin view: every event.
    All,
    /// Public view: published events only.
    Published,
}

impl Visibility {
    pub fn includes(self, event: &Event) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Published => event.is_published,
        }
    }
}
