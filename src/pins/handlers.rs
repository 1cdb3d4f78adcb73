use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::AppError, state::AppState};

use super::{
    dto::{CreatePinRequest, PinFilter},
    repo::BoardNotFound,
    repo_types::{NewPin, Pin},
};

pub fn pin_routes() -> Router<AppState> {
    Router::new()
        .route("/pins", get(list_pins).post(create_pin))
        .route("/pins/:id", delete(delete_pin))
}

#[instrument(skip(state))]
pub async fn list_pins(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<PinFilter>,
) -> Result<Json<Vec<Pin>>, AppError> {
    let pins = match filter.board_id {
        Some(board_id) => state.pins.list_by_board(user_id, board_id).await?,
        None => state.pins.list_feed(user_id).await?,
    };
    Ok(Json(pins))
}

#[instrument(skip(state, payload))]
pub async fn create_pin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePinRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Pin>), AppError> {
    let new_pin = NewPin::new(
        payload.board_id,
        &payload.image_url,
        &payload.title,
        &payload.link_url,
        &payload.note,
    )?;
    let pin = match state.pins.insert(user_id, new_pin).await {
        Ok(pin) => pin,
        Err(e) if e.downcast_ref::<BoardNotFound>().is_some() => {
            warn!(%user_id, "pin insert into unknown board");
            return Err(AppError::NotFound("Board"));
        }
        Err(e) => return Err(e.into()),
    };
    info!(%user_id, pin_id = %pin.id, board_id = %pin.board_id, "pin created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/pins/{}", pin.id))],
        Json(pin),
    ))
}

#[instrument(skip(state))]
pub async fn delete_pin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let found = state.pins.delete(user_id, id).await?;
    info!(%user_id, pin_id = %id, found, "pin deleted");
    Ok(StatusCode::NO_CONTENT)
}
