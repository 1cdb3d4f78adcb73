use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod pages;
mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod session;

/// JSON auth endpoints, nested under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
