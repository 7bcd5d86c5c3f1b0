pub mod events;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Event, EventChanges, EventFilter, NewEvent, Visibility};
use crate::pagination::{Page, PageRequest};

pub use events::PgEventStore;
pub use memory::MemoryEventStore;

/// Storage seam for the events table. Handlers only ever talk to this trait.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Filtered listing, ascending by start time.
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error>;

    async fn count(&self, visibility: Visibility) -> Result<i64, sqlx::Error>;

    /// One window of the listing, ascending by start time.
    async fn list_window(
        &self,
        visibility: Visibility,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error>;

    async fn find(&self, id: Uuid) -> Result<Option<Event>, sqlx::Error>;

    /// `None` means the write reported no row.
    async fn insert(&self, event: &NewEvent) -> Result<Option<Event>, sqlx::Error>;

    /// `None` means no row matched `id`.
    async fn update(&self, id: Uuid, changes: &EventChanges)
    -> Result<Option<Event>, sqlx::Error>;

    /// `false` means no row matched `id`.
    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

pub async fn paged(
    store: &dyn EventStore,
    visibility: Visibility,
    request: PageRequest,
) -> Result<Page<Event>, sqlx::Error> {
    let total = store.count(visibility).await?;
    let data = store
        .list_window(visibility, request.page_size, request.offset())
        .await?;
    Ok(Page::new(data, request, total))
}
