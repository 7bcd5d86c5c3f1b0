use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::EventStore;
use crate::models::{Event, EventChanges, EventFilter, NewEvent, Visibility};

pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM events WHERE TRUE");

    if let Some(campus) = &filter.campus {
        query.push(" AND campus = ").push_bind(campus.clone());
    }
    if let Some(category) = &filter.category {
        query.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(published) = filter.published {
        query.push(" AND is_published = ").push_bind(published);
    }
    query.push(" ORDER BY start_date_time ASC");

    query.build_query_as::<Event>().fetch_all(pool).await
}

pub async fn count(pool: &PgPool, visibility: Visibility) -> Result<i64, sqlx::Error> {
    let sql = match visibility {
        Visibility::All => "SELECT COUNT(*) FROM events",
        Visibility::Published => "SELECT COUNT(*) FROM events WHERE is_published = TRUE",
    };
    sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await
}

pub async fn list_window(
    pool: &PgPool,
    visibility: Visibility,
    limit: i64,
    offset: i64,
) -> Result<Vec<Event>, sqlx::Error> {
    let sql = match visibility {
        Visibility::All => {
            "SELECT * FROM events ORDER BY start_date_time ASC LIMIT $1 OFFSET $2"
        }
        Visibility::Published => {
            "SELECT * FROM events WHERE is_published = TRUE
             ORDER BY start_date_time ASC LIMIT $1 OFFSET $2"
        }
    };
    sqlx::query_as::<_, Event>(sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, event: &NewEvent) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "INSERT INTO events
            (title, description, campus, category, start_date_time, end_date_time, cost, is_published)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.campus)
    .bind(&event.category)
    .bind(event.start_date_time)
    .bind(event.end_date_time)
    .bind(event.cost)
    .bind(event.is_published)
    .fetch_optional(pool)
    .await
}

/// Only the supplied columns are written; `updated_at` is left alone.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &EventChanges,
) -> Result<Option<Event>, sqlx::Error> {
    if changes.is_empty() {
        return find_by_id(pool, id).await;
    }

    let mut query = QueryBuilder::<Postgres>::new("UPDATE events SET ");
    let mut set = query.separated(", ");
    if let Some(title) = &changes.title {
        set.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(description) = &changes.description {
        set.push("description = ")
            .push_bind_unseparated(description.clone());
    }
    if let Some(campus) = &changes.campus {
        set.push("campus = ").push_bind_unseparated(campus.clone());
    }
    if let Some(category) = &changes.category {
        set.push("category = ").push_bind_unseparated(category.clone());
    }
    if let Some(start) = changes.start_date_time {
        set.push("start_date_time = ").push_bind_unseparated(start);
    }
    if let Some(end) = changes.end_date_time {
        set.push("end_date_time = ").push_bind_unseparated(end);
    }
    if let Some(cost) = changes.cost {
        set.push("cost = ").push_bind_unseparated(cost);
    }
    if let Some(published) = changes.is_published {
        set.push("is_published = ").push_bind_unseparated(published);
    }
    query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

    query.build_query_as::<Event>().fetch_optional(pool).await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// [`EventStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        list(&self.pool, filter).await
    }

    async fn count(&self, visibility: Visibility) -> Result<i64, sqlx::Error> {
        count(&self.pool, visibility).await
    }

    async fn list_window(
        &self,
        visibility: Visibility,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        list_window(&self.pool, visibility, limit, offset).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
        find_by_id(&self.pool, id).await
    }

    async fn insert(&self, event: &NewEvent) -> Result<Option<Event>, sqlx::Error> {
        create(&self.pool, event).await
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &EventChanges,
    ) -> Result<Option<Event>, sqlx::Error> {
        update(&self.pool, id, changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        delete(&self.pool, id).await
    }
}
