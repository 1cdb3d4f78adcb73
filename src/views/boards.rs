use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    boards::{repo::BoardRepository, repo_types::Board},
    pins::repo::PinRepository,
    views::{forms::CreatePinForm, pin_card::PinCard, Confirmation, DeleteOutcome},
};

/// "My Boards" grid.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardList {
    boards: Vec<Board>,
}

impl BoardList {
    pub async fn load(user_id: Uuid, boards: &dyn BoardRepository) -> anyhow::Result<Self> {
        Ok(Self {
            boards: boards.list_by_user(user_id).await?,
        })
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }
}

/// Deletes a board and, through the store's cascade, its pins. Deleting an id
/// that is already gone counts as deleted.
pub async fn delete_board(
    user_id: Uuid,
    board_id: Uuid,
    confirmation: Confirmation,
    boards: &dyn BoardRepository,
) -> anyhow::Result<DeleteOutcome> {
    if confirmation == Confirmation::Cancelled {
        return Ok(DeleteOutcome::Cancelled);
    }
    match boards.delete(user_id, board_id).await {
        Ok(found) => {
            info!(%user_id, %board_id, found, "board deleted");
            Ok(DeleteOutcome::Deleted)
        }
        Err(e) => {
            warn!(%user_id, %board_id, error = %format!("{e:#}"), "delete board failed");
            Err(e)
        }
    }
}

/// One board with its pins, plus every board for the pin modal's selector.
#[derive(Debug, Clone, Serialize)]
pub struct BoardPage {
    pub board: Board,
    pub pins: Vec<PinCard>,
    pub all_boards: Vec<Board>,
}

#[derive(Debug, Clone)]
pub enum BoardDetail {
    NotFound,
    Found(BoardPage),
}

impl BoardDetail {
    /// Loads the three parts concurrently. `None` (an unparseable id) is not found.
    pub async fn load(
        user_id: Uuid,
        board_id: Option<Uuid>,
        boards: &dyn BoardRepository,
        pins: &dyn PinRepository,
    ) -> anyhow::Result<Self> {
        let Some(board_id) = board_id else {
            return Ok(BoardDetail::NotFound);
        };

        let (board, board_pins, all_boards) = tokio::try_join!(
            boards.find(user_id, board_id),
            pins.list_by_board(user_id, board_id),
            boards.list_by_user(user_id),
        )?;

        Ok(match board {
            None => BoardDetail::NotFound,
            Some(board) => BoardDetail::Found(BoardPage {
                board,
                pins: board_pins.into_iter().map(PinCard::new).collect(),
                all_boards,
            }),
        })
    }
}

impl BoardPage {
    /// The add-pin modal opened from here preselects this board.
    pub fn create_pin_form(&self) -> CreatePinForm {
        CreatePinForm::new(&self.all_boards, Some(self.board.id))
    }
}
