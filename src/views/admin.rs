use askama::Template;
use axum::extract::{Form, Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::auth::AdminSession;
use crate::db;
use crate::error::AppError;
use crate::models::{Event, EventChanges, Visibility};
use crate::pagination::{PageParams, PageRequest};
use crate::query::QueryParams;
use crate::routes::events::FAILED_TO_CREATE;
use crate::state::SharedState;
use crate::validation::{self, ValidationError, parse_event_id};
use crate::views::auth::safe_callback;
use crate::views::{PaginationLinks, render};

const DATETIME_LOCAL: &str = "%Y-%m-%dT%H:%M";

#[derive(Template)]
#[template(path = "admin/index.html")]
struct AdminIndexTemplate {
    admin_name: String,
    events: Vec<AdminRow>,
    pagination: PaginationLinks,
    return_to: String,
}

struct AdminRow {
    id: String,
    title: String,
    campus: String,
    starts: String,
    is_published: bool,
}

#[derive(Template)]
#[template(path = "admin/form.html")]
struct EventFormTemplate {
    heading: String,
    action: String,
    submit_label: String,
    values: EventForm,
    errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "admin/delete.html")]
struct DeleteTemplate {
    id: String,
    title: String,
}

#[derive(Template)]
#[template(path = "admin/not_found.html")]
struct NotFoundTemplate;

/// The create/edit form, as submitted. Everything arrives as text; the
/// checkbox is present only when ticked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub campus: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub start_date_time: String,
    #[serde(default)]
    pub end_date_time: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub is_published: Option<String>,
}

impl EventForm {
    fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            campus: event.campus.clone(),
            category: event.category.clone(),
            start_date_time: event.start_date_time.format(DATETIME_LOCAL).to_string(),
            end_date_time: event.end_date_time.format(DATETIME_LOCAL).to_string(),
            cost: event.cost.to_string(),
            is_published: event.is_published.then(|| "on".to_string()),
        }
    }

    fn published(&self) -> bool {
        self.is_published.is_some()
    }

    /// Same JSON shape the API accepts, so both paths share one validator.
    pub fn payload(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "campus": self.campus,
            "category": self.category,
            "startDateTime": self.start_date_time,
            "endDateTime": self.end_date_time,
            "cost": self.cost,
            "isPublished": self.published(),
        })
    }
}

/// Per-field messages; empty means the field is fine.
#[derive(Debug, Default)]
struct FieldErrors {
    title: String,
    description: String,
    campus: String,
    category: String,
    start_date_time: String,
    end_date_time: String,
    cost: String,
}

impl From<&ValidationError> for FieldErrors {
    fn from(err: &ValidationError) -> Self {
        let message = |field: &str| err.message_for(field).unwrap_or_default().to_string();
        Self {
            title: message("title"),
            description: message("description"),
            campus: message("campus"),
            category: message("category"),
            start_date_time: message("startDateTime"),
            end_date_time: message("endDateTime"),
            cost: message("cost"),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishForm {
    pub is_published: Option<String>,
    pub return_to: Option<String>,
}

fn new_form(values: EventForm, errors: FieldErrors) -> EventFormTemplate {
    EventFormTemplate {
        heading: "New event".to_string(),
        action: "/admin/new".to_string(),
        submit_label: "Create event".to_string(),
        values,
        errors,
    }
}

fn edit_form(id: Uuid, values: EventForm, errors: FieldErrors) -> EventFormTemplate {
    EventFormTemplate {
        heading: "Edit event".to_string(),
        action: format!("/admin/{id}"),
        submit_label: "Save changes".to_string(),
        values,
        errors,
    }
}

fn not_found_page() -> Result<Response, AppError> {
    Ok((StatusCode::NOT_FOUND, render(&NotFoundTemplate)?).into_response())
}

fn invalid_form(template: &EventFormTemplate) -> Result<Response, AppError> {
    Ok((StatusCode::BAD_REQUEST, render(template)?).into_response())
}

pub async fn index(
    AdminSession(admin): AdminSession,
    State(state): State<SharedState>,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let params = PageParams::from_query(QueryParams::parse(raw.as_deref()));
    let request = PageRequest::from_params(&params, &state.config.pagination);
    let page = db::paged(state.store.as_ref(), Visibility::All, request).await?;
    let pagination = PaginationLinks::new("/admin", &page);

    let template = AdminIndexTemplate {
        admin_name: admin.name,
        events: page
            .data
            .iter()
            .map(|e| AdminRow {
                id: e.id.to_string(),
                title: e.title.clone(),
                campus: e.campus.clone(),
                starts: e.start_date_time.format("%Y-%m-%d %H:%M").to_string(),
                is_published: e.is_published,
            })
            .collect(),
        return_to: pagination.current_href("/admin", page.page_size),
        pagination,
    };
    Ok(render(&template)?.into_response())
}

pub async fn new_page(_admin: AdminSession) -> Result<Response, AppError> {
    Ok(render(&new_form(EventForm::default(), FieldErrors::default()))?.into_response())
}

pub async fn create(
    _admin: AdminSession,
    State(state): State<SharedState>,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    let new_event = match validation::validate_create(&form.payload()) {
        Ok(new_event) => new_event,
        Err(err) => {
            let errors = FieldErrors::from(&err);
            return invalid_form(&new_form(form, errors));
        }
    };

    let event = state
        .store
        .insert(&new_event)
        .await?
        .ok_or_else(|| AppError::StorageInconsistency(FAILED_TO_CREATE.to_string()))?;

    tracing::info!(event_id = %event.id, "Event created from admin form");
    Ok(Redirect::to("/admin").into_response())
}

pub async fn edit_page(
    _admin: AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = parse_event_id(&id) else {
        return not_found_page();
    };
    let Some(event) = state.store.find(id).await? else {
        return not_found_page();
    };

    let template = edit_form(id, EventForm::from_event(&event), FieldErrors::default());
    Ok(render(&template)?.into_response())
}

pub async fn update(
    _admin: AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    let Ok(id) = parse_event_id(&id) else {
        return not_found_page();
    };

    let changes = match validation::validate_update(&form.payload()) {
        Ok(changes) => changes,
        Err(err) => {
            let errors = FieldErrors::from(&err);
            return invalid_form(&edit_form(id, form, errors));
        }
    };

    if state.store.update(id, &changes).await?.is_none() {
        return not_found_page();
    }

    tracing::info!(event_id = %id, "Event updated from admin form");
    Ok(Redirect::to("/admin").into_response())
}

pub async fn toggle_publish(
    _admin: AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Form(form): Form<PublishForm>,
) -> Result<Response, AppError> {
    let Ok(id) = parse_event_id(&id) else {
        return not_found_page();
    };

    let changes = EventChanges {
        is_published: Some(form.is_published.as_deref() == Some("true")),
        ..Default::default()
    };
    let Some(event) = state.store.update(id, &changes).await? else {
        return not_found_page();
    };

    tracing::info!(event_id = %id, published = event.is_published, "Event visibility changed");
    let back = safe_callback(form.return_to.as_deref());
    Ok(Redirect::to(&back).into_response())
}

pub async fn delete_page(
    _admin: AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = parse_event_id(&id) else {
        return not_found_page();
    };
    let Some(event) = state.store.find(id).await? else {
        return not_found_page();
    };

    let template = DeleteTemplate {
        id: event.id.to_string(),
        title: event.title,
    };
    Ok(render(&template)?.into_response())
}

pub async fn delete(
    _admin: AdminSession,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = parse_event_id(&id) else {
        return not_found_page();
    };
    if !state.store.delete(id).await? {
        return not_found_page();
    }

    tracing::info!(event_id = %id, "Event deleted from admin");
    Ok(Redirect::to("/admin").into_response())
}
