pub mod auth;
pub mod events;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use crate::middleware::api_guard::protect_writes;
use crate::state::SharedState;

pub fn api_routes(state: SharedState) -> Router<SharedState> {
    let event_routes = Router::new()
        .route("/api/events", get(events::list).post(events::create))
        .route(
            "/api/events/{id}",
            get(events::get)
                .put(events::update)
                .delete(events::delete),
        )
        .route_layer(from_fn_with_state(state, protect_writes));

    Router::new()
        .merge(event_routes)
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
}
