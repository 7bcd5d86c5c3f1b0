pub mod api_guard;
pub mod auth_redirect;
