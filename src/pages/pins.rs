use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::session::{safe_redirect_target, CurrentUser, Session},
    error::AppError,
    state::AppState,
    views::{
        feed::Feed,
        forms::{CreatePinForm, NOT_AUTHENTICATED},
        pin_card::delete_pin,
    },
};

use super::{alert, boards, feed, DeleteInput};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PinInput {
    pub image_url: String,
    pub title: String,
    pub link_url: String,
    pub note: String,
    pub board_id: String,
    pub return_to: Option<String>,
}

/// Add-pin modal submit. Success returns to the page the modal was opened on;
/// failure re-renders that page with the modal still filled in.
#[instrument(skip(state, session, input))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<PinInput>,
) -> Result<Response, AppError> {
    let target = safe_redirect_target(input.return_to.as_deref()).to_string();

    let mut form = CreatePinForm::default();
    form.board_id = Uuid::parse_str(input.board_id.trim()).ok();
    form.image_url = input.image_url;
    form.title = input.title;
    form.link_url = input.link_url;
    form.note = input.note;

    if form.submit(&session, state.pins.as_ref()).await.is_some() {
        return Ok(Redirect::to(&target).into_response());
    }

    let Some(identity) = session.identity() else {
        return alert(&state, StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED, "/login");
    };

    match target.strip_prefix("/app/boards/") {
        Some(raw_id) => {
            let board_id = Uuid::parse_str(raw_id).ok();
            boards::render_detail(&state, identity, raw_id, board_id, |_| Some(form)).await
        }
        None => {
            let loaded = Feed::load(identity.id, state.boards.as_ref(), state.pins.as_ref()).await?;
            feed::render(&state, identity, &loaded, Some(form))
        }
    }
}

#[instrument(skip(state, identity, input), fields(user_id = %identity.id))]
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(pin_id): Path<Uuid>,
    Form(input): Form<DeleteInput>,
) -> Result<Response, AppError> {
    let target = safe_redirect_target(input.return_to.as_deref());
    match delete_pin(identity.id, pin_id, input.confirmation(), state.pins.as_ref()).await {
        Ok(_) => Ok(Redirect::to(target).into_response()),
        Err(message) => alert(&state, StatusCode::INTERNAL_SERVER_ERROR, &message, target),
    }
}
