//! Server-rendered screens behind the session gate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use minijinja::context;
use serde::Deserialize;

use crate::{error::AppError, state::AppState, views::Confirmation};

mod boards;
mod feed;
mod pins;
#[cfg(test)]
pub mod testing;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app", get(feed::show))
        .route("/app/boards", get(boards::index).post(boards::create))
        .route("/app/boards/:id", get(boards::show))
        .route("/app/boards/:id/delete", post(boards::delete))
        .route("/app/pins", post(pins::create))
        .route("/app/pins/:id/delete", post(pins::delete))
}

/// `?new=1` opens the page's create modal.
#[derive(Debug, Default, Deserialize)]
pub struct ModalQuery {
    pub new: Option<String>,
}

impl ModalQuery {
    pub fn is_open(&self) -> bool {
        matches!(self.new.as_deref(), Some("1" | "true"))
    }
}

/// Body of the delete forms. The confirm dialog sets `confirm=true`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteInput {
    pub confirm: Option<String>,
    pub return_to: Option<String>,
}

impl DeleteInput {
    pub fn confirmation(&self) -> Confirmation {
        Confirmation::from(self.confirm.as_deref() == Some("true"))
    }
}

/// Blocking error notice; the user acknowledges it and goes back.
pub fn alert(
    state: &AppState,
    status: StatusCode,
    message: &str,
    back: &str,
) -> Result<Response, AppError> {
    let html = state
        .templates
        .render("alert.html", context! { message, back })?;
    Ok((status, html).into_response())
}

fn form_status(error: &Option<String>) -> StatusCode {
    if error.is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    }
}
