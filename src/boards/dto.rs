use serde::{Deserialize, Serialize};

use crate::{boards::repo_types::Board, pins::repo_types::Pin};

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct BoardDetails {
    #[serde(flatten)]
    pub board: Board,
    pub pins: Vec<Pin>,
}
