use serde::Serialize;
use uuid::Uuid;

use crate::{
    boards::{repo::BoardRepository, repo_types::Board},
    pins::repo::PinRepository,
    views::{forms::CreatePinForm, pin_card::PinCard},
};

pub const NO_BOARDS_TOOLTIP: &str = "Create a board first";

/// Home feed: every pin of the user across boards, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Feed {
    pub pins: Vec<PinCard>,
    pub boards: Vec<Board>,
}

impl Feed {
    pub async fn load(
        user_id: Uuid,
        boards: &dyn BoardRepository,
        pins: &dyn PinRepository,
    ) -> anyhow::Result<Self> {
        let (pins, boards) =
            tokio::try_join!(pins.list_feed(user_id), boards.list_by_user(user_id))?;
        Ok(Self {
            pins: pins.into_iter().map(PinCard::new).collect(),
            boards,
        })
    }

    /// A pin needs a board to live on.
    pub fn can_add_pin(&self) -> bool {
        !self.boards.is_empty()
    }

    pub fn add_pin_tooltip(&self) -> Option<&'static str> {
        (!self.can_add_pin()).then_some(NO_BOARDS_TOOLTIP)
    }

    pub fn create_pin_form(&self) -> Option<CreatePinForm> {
        self.can_add_pin()
            .then(|| CreatePinForm::new(&self.boards, None))
    }
}
