pub mod admin;
pub mod auth;
pub mod public;

use askama::Template;
use axum::Router;
use axum::middleware::from_fn;
use axum::response::Html;
use axum::routing::{get, post};

use crate::error::AppError;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::pagination::Page;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    let admin_routes = Router::new()
        .route("/admin", get(admin::index))
        .route("/admin/new", get(admin::new_page).post(admin::create))
        .route("/admin/{id}", get(admin::edit_page).post(admin::update))
        .route("/admin/{id}/publish", post(admin::toggle_publish))
        .route(
            "/admin/{id}/delete",
            get(admin::delete_page).post(admin::delete),
        )
        .layer(from_fn(redirect_unauthorized));

    Router::new()
        .route("/", get(public::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(admin_routes)
}

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}

/// Previous / "Page N of M" / Next. An empty href means the link is disabled.
pub struct PaginationLinks {
    pub page: i64,
    pub total_pages: i64,
    pub prev_href: String,
    pub next_href: String,
}

impl PaginationLinks {
    pub fn new<T>(base: &str, page: &Page<T>) -> Self {
        let href = |n: i64| format!("{base}?page={n}&pageSize={}", page.page_size);
        Self {
            page: page.page,
            total_pages: page.total_pages,
            prev_href: if page.page > 1 {
                href(page.page - 1)
            } else {
                String::new()
            },
            next_href: if page.page < page.total_pages {
                href(page.page + 1)
            } else {
                String::new()
            },
        }
    }

    pub fn current_href(&self, base: &str, page_size: i64) -> String {
        format!("{base}?page={}&pageSize={page_size}", self.page)
    }
}
