use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::EventStore;
use crate::models::{Event, EventChanges, EventFilter, NewEvent, Visibility};

/// In-memory [`EventStore`] for development and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryEventStore {
    events: Arc<RwLock<Vec<Event>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows sorted the way every listing query sorts them. Stable, so equal
    /// start times keep insertion order.
    async fn sorted<F>(&self, keep: F) -> Vec<Event>
    where
        F: Fn(&Event) -> bool,
    {
        let events = self.events.read().await;
        let mut rows: Vec<Event> = events.iter().filter(|e| keep(*e)).cloned().collect();
        rows.sort_by_key(|e| e.start_date_time);
        rows
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        Ok(self.sorted(|e| filter.matches(e)).await)
    }

    async fn count(&self, visibility: Visibility) -> Result<i64, sqlx::Error> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|e| visibility.includes(e)).count() as i64)
    }

    async fn list_window(
        &self,
        visibility: Visibility,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let rows = self.sorted(|e| visibility.includes(e)).await;
        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, new: &NewEvent) -> Result<Option<Event>, sqlx::Error> {
        let now = Utc::now().naive_utc();
        let event = Event {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            description: new.description.clone(),
            campus: new.campus.clone(),
            category: new.category.clone(),
            start_date_time: new.start_date_time,
            end_date_time: new.end_date_time,
            cost: new.cost,
            is_published: new.is_published,
            created_at: now,
            updated_at: now,
        };

        self.events.write().await.push(event.clone());
        Ok(Some(event))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &EventChanges,
    ) -> Result<Option<Event>, sqlx::Error> {
        let mut events = self.events.write().await;
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        changes.apply_to(event);
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() != before)
    }
}
