use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{
        repo_types::Identity,
        session::{CurrentUser, Session},
    },
    error::AppError,
    state::AppState,
    views::{
        boards::{delete_board, BoardDetail, BoardList, BoardPage},
        forms::{CreateBoardForm, CreatePinForm, NOT_AUTHENTICATED},
        navbar::Navbar,
    },
};

use super::{alert, form_status, DeleteInput, ModalQuery};

#[derive(Debug, Deserialize)]
pub struct BoardInput {
    #[serde(default)]
    pub title: String,
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Query(modal): Query<ModalQuery>,
) -> Result<Response, AppError> {
    let list = BoardList::load(identity.id, state.boards.as_ref()).await?;
    let form = modal.is_open().then(CreateBoardForm::new);
    render_index(&state, &identity, &list, form)
}

#[instrument(skip(state, session, input))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<BoardInput>,
) -> Result<Response, AppError> {
    let mut form = CreateBoardForm::with_title(input.title);
    if form.submit(&session, state.boards.as_ref()).await.is_some() {
        return Ok(Redirect::to("/app/boards").into_response());
    }

    let Some(identity) = session.identity() else {
        return alert(&state, StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED, "/login");
    };
    let list = BoardList::load(identity.id, state.boards.as_ref()).await?;
    render_index(&state, identity, &list, Some(form))
}

fn render_index(
    state: &AppState,
    identity: &Identity,
    list: &BoardList,
    board_form: Option<CreateBoardForm>,
) -> Result<Response, AppError> {
    let status = board_form
        .as_ref()
        .map_or(StatusCode::OK, |f| form_status(&f.error));
    let html = state.templates.render(
        "boards.html",
        context! {
            navbar => Navbar::new(identity, "/app/boards"),
            boards => list.boards(),
            board_form,
        },
    )?;
    Ok((status, html).into_response())
}

#[instrument(skip(state, identity), fields(user_id = %identity.id))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(raw_id): Path<String>,
    Query(modal): Query<ModalQuery>,
) -> Result<Response, AppError> {
    let board_id = Uuid::parse_str(&raw_id).ok();
    render_detail(&state, &identity, &raw_id, board_id, |page| {
        modal.is_open().then(|| page.create_pin_form())
    })
    .await
}

/// Board page. `pin_form` decides whether the add-pin modal is shown.
pub async fn render_detail(
    state: &AppState,
    identity: &Identity,
    raw_id: &str,
    board_id: Option<Uuid>,
    pin_form: impl FnOnce(&BoardPage) -> Option<CreatePinForm>,
) -> Result<Response, AppError> {
    let here = format!("/app/boards/{raw_id}");
    let navbar = Navbar::new(identity, &here);
    let detail = BoardDetail::load(
        identity.id,
        board_id,
        state.boards.as_ref(),
        state.pins.as_ref(),
    )
    .await?;

    let BoardDetail::Found(page) = detail else {
        let html = state
            .templates
            .render("board_detail.html", context! { navbar })?;
        return Ok((StatusCode::NOT_FOUND, html).into_response());
    };

    let pin_form = pin_form(&page);
    let status = pin_form
        .as_ref()
        .map_or(StatusCode::OK, |f| form_status(&f.error));
    let html = state.templates.render(
        "board_detail.html",
        context! { navbar, page, here, pin_form },
    )?;
    Ok((status, html).into_response())
}

#[instrument(skip(state, identity, input), fields(user_id = %identity.id))]
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(board_id): Path<Uuid>,
    Form(input): Form<DeleteInput>,
) -> Result<Response, AppError> {
    match delete_board(
        identity.id,
        board_id,
        input.confirmation(),
        state.boards.as_ref(),
    )
    .await
    {
        Ok(_) => Ok(Redirect::to("/app/boards").into_response()),
        Err(e) => alert(
            &state,
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to delete board: {e:#}"),
            "/app/boards",
        ),
    }
}
