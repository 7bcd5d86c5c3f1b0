use askama::Template;
use axum::extract::{RawQuery, State};
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;

use crate::auth::session::principal_from_jar;
use crate::db;
use crate::error::AppError;
use crate::models::{Event, Visibility};
use crate::pagination::{PageParams, PageRequest};
use crate::query::QueryParams;
use crate::state::SharedState;
use crate::views::{PaginationLinks, render};

#[derive(Template)]
#[template(path = "public/index.html")]
struct PublicIndexTemplate {
    is_admin: bool,
    events: Vec<EventCard>,
    pagination: PaginationLinks,
}

struct EventCard {
    title: String,
    date: String,
    description: String,
}

impl From<&Event> for EventCard {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: event.start_date_time.format("%B %-d, %Y").to_string(),
            description: event.description.clone(),
        }
    }
}

pub async fn index(
    State(state): State<SharedState>,
    jar: CookieJar,
    RawQuery(raw): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    let params = PageParams::from_query(QueryParams::parse(raw.as_deref()));
    let request = PageRequest::from_params(&params, &state.config.pagination);
    let page = db::paged(state.store.as_ref(), Visibility::Published, request).await?;

    let template = PublicIndexTemplate {
        is_admin: principal_from_jar(&jar, &state.config.session_secret).is_some(),
        events: page.data.iter().map(EventCard::from).collect(),
        pagination: PaginationLinks::new("/", &page),
    };
    render(&template)
}
