use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use minijinja::context;
use tracing::instrument;

use crate::{
    auth::{repo_types::Identity, session::CurrentUser},
    error::AppError,
    state::AppState,
    views::{feed::Feed, forms::CreatePinForm, navbar::Navbar},
};

use super::{form_status, ModalQuery};

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Query(modal): Query<ModalQuery>,
) -> Result<Response, AppError> {
    let feed = Feed::load(identity.id, state.boards.as_ref(), state.pins.as_ref()).await?;
    let pin_form = if modal.is_open() {
        feed.create_pin_form()
    } else {
        None
    };
    render(&state, &identity, &feed, pin_form)
}

/// Feed page, optionally with the add-pin modal open.
pub fn render(
    state: &AppState,
    identity: &Identity,
    feed: &Feed,
    pin_form: Option<CreatePinForm>,
) -> Result<Response, AppError> {
    let status = pin_form
        .as_ref()
        .map_or(StatusCode::OK, |f| form_status(&f.error));
    let html = state.templates.render(
        "feed.html",
        context! {
            navbar => Navbar::new(identity, "/app"),
            feed,
            tooltip => feed.add_pin_tooltip(),
            pin_form,
        },
    )?;
    Ok((status, html).into_response())
}
