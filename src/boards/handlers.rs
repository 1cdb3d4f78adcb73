use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    state::AppState,
    views::boards::BoardDetail,
};

use super::{
    dto::{BoardDetails, CreateBoardRequest},
    repo_types::{Board, NewBoard},
};

pub fn board_routes() -> Router<AppState> {
    Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route("/boards/:id", get(get_board).delete(delete_board))
}

#[instrument(skip(state))]
pub async fn list_boards(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Board>>, AppError> {
    Ok(Json(state.boards.list_by_user(user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_board(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BoardDetails>, AppError> {
    match BoardDetail::load(user_id, Some(id), state.boards.as_ref(), state.pins.as_ref()).await? {
        BoardDetail::Found(page) => Ok(Json(BoardDetails {
            board: page.board,
            pins: page.pins.into_iter().map(|card| card.pin).collect(),
        })),
        BoardDetail::NotFound => Err(AppError::NotFound("Board")),
    }
}

#[instrument(skip(state, payload))]
pub async fn create_board(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateBoardRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Board>), AppError> {
    let new_board = NewBoard::new(&payload.title)?;
    let board = state.boards.insert(user_id, new_board).await?;
    info!(%user_id, board_id = %board.id, "board created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/boards/{}", board.id))],
        Json(board),
    ))
}

/// Idempotent: deleting a missing board still answers 204.
#[instrument(skip(state))]
pub async fn delete_board(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let found = state.boards.delete(user_id, id).await?;
    info!(%user_id, board_id = %id, found, "board deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::{app::build_app, auth::jwt::JwtKeys, state::AppState};
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json");
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    fn token(state: &AppState) -> String {
        JwtKeys::from_ref(state).sign_access(Uuid::new_v4()).unwrap()
    }

    #[tokio::test]
    async fn create_list_get_delete() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let token = token(&state);

        let payload = json!({ "title": " Travel Inspo " });
        let (status, board) = call(&app, "POST", "/api/v1/boards", &token, Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(board["title"], "Travel Inspo");
        let id = board["id"].as_str().unwrap().to_string();

        let (_, list) = call(&app, "GET", "/api/v1/boards", &token, None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let uri = format!("/api/v1/boards/{id}");
        let (status, detail) = call(&app, "GET", &uri, &token, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["title"], "Travel Inspo");
        assert_eq!(detail["pins"], json!([]));

        for _ in 0..2 {
            let (status, _) = call(&app, "DELETE", &uri, &token, None).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }
        let (status, body) = call(&app, "GET", &uri, &token, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Board not found");
    }

    #[tokio::test]
    async fn blank_title_is_bad_request() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let payload = json!({ "title": "  " });
        let (status, body) = call(&app, "POST", "/api/v1/boards", &token(&state), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Board name is required.");
    }

    #[tokio::test]
    async fn session_token_is_not_a_bearer_token() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let session = JwtKeys::from_ref(&state).sign_session(Uuid::new_v4()).unwrap();
        let (status, _) = call(&app, "GET", "/api/v1/boards", &session, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
