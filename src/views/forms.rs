use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::session::Session,
    boards::{
        repo::BoardRepository,
        repo_types::{Board, NewBoard},
    },
    pins::{
        repo::PinRepository,
        repo_types::{NewPin, Pin},
    },
};

/// `Editing → Submitting → Closed`, or back to `Editing` with an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Closed,
}

pub const NOT_AUTHENTICATED: &str = "Not authenticated.";

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateBoardForm {
    pub title: String,
    pub error: Option<String>,
    phase: FormPhase,
}

impl CreateBoardForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates, re-checks the session, then inserts. Returns the stored row
    /// on success and closes; otherwise stays open with `error` set.
    pub async fn submit(
        &mut self,
        session: &Session,
        boards: &dyn BoardRepository,
    ) -> Option<Board> {
        if self.phase != FormPhase::Editing {
            return None;
        }
        let new_board = match NewBoard::new(&self.title) {
            Ok(b) => b,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        self.phase = FormPhase::Submitting;
        self.error = None;

        let Some(user_id) = session.user_id() else {
            self.fail(NOT_AUTHENTICATED.to_string());
            return None;
        };

        match boards.insert(user_id, new_board).await {
            Ok(board) => {
                info!(%user_id, board_id = %board.id, "board created");
                self.phase = FormPhase::Closed;
                Some(board)
            }
            Err(e) => {
                let message = format!("{e:#}");
                warn!(%user_id, error = %message, "create board failed");
                self.fail(message);
                None
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.phase = FormPhase::Editing;
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatePinForm {
    pub image_url: String,
    pub title: String,
    pub link_url: String,
    pub note: String,
    pub board_id: Option<Uuid>,
    pub error: Option<String>,
    phase: FormPhase,
}

impl CreatePinForm {
    /// Board selector starts on `default_board`, else on the first board.
    pub fn new(boards: &[Board], default_board: Option<Uuid>) -> Self {
        Self {
            board_id: default_board.or_else(|| boards.first().map(|b| b.id)),
            ..Self::default()
        }
    }

    pub async fn submit(&mut self, session: &Session, pins: &dyn PinRepository) -> Option<Pin> {
        if self.phase != FormPhase::Editing {
            return None;
        }
        let new_pin = match NewPin::new(
            self.board_id,
            &self.image_url,
            &self.title,
            &self.link_url,
            &self.note,
        ) {
            Ok(p) => p,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        self.phase = FormPhase::Submitting;
        self.error = None;

        let Some(user_id) = session.user_id() else {
            self.fail(NOT_AUTHENTICATED.to_string());
            return None;
        };

        match pins.insert(user_id, new_pin).await {
            Ok(pin) => {
                info!(%user_id, pin_id = %pin.id, board_id = %pin.board_id, "pin created");
                self.phase = FormPhase::Closed;
                Some(pin)
            }
            Err(e) => {
                let message = format!("{e:#}");
                warn!(%user_id, error = %message, "create pin failed");
                self.fail(message);
                None
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.phase = FormPhase::Editing;
    }
}
