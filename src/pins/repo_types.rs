use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ValidationError;

/// Minimal projection of the parent board, shown on feed cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRef {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub id: Uuid,
    pub user_id: Uuid,
    pub board_id: Uuid,
    pub image_url: String,
    pub title: Option<String>,
    pub link_url: Option<String>,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub board: Option<BoardRef>,
}

/// Row shape shared by every pin query; `board_title` is NULL when not joined.
#[derive(Debug, FromRow)]
pub struct PinRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub board_id: Uuid,
    pub image_url: String,
    pub title: Option<String>,
    pub link_url: Option<String>,
    pub note: Option<String>,
    pub created_at: OffsetDateTime,
    pub board_title: Option<String>,
}

impl From<PinRow> for Pin {
    fn from(r: PinRow) -> Self {
        Self {
            board: r.board_title.map(|title| BoardRef {
                id: r.board_id,
                title,
            }),
            id: r.id,
            user_id: r.user_id,
            board_id: r.board_id,
            image_url: r.image_url,
            title: r.title,
            link_url: r.link_url,
            note: r.note,
            created_at: r.created_at,
        }
    }
}

/// Validated insert payload. Optional fields are trimmed and blank ones dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPin {
    pub board_id: Uuid,
    pub image_url: String,
    pub title: Option<String>,
    pub link_url: Option<String>,
    pub note: Option<String>,
}

impl NewPin {
    pub fn new(
        board_id: Option<Uuid>,
        image_url: &str,
        title: &str,
        link_url: &str,
        note: &str,
    ) -> Result<Self, ValidationError> {
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(ValidationError::ImageUrlRequired);
        }
        let board_id = board_id.ok_or(ValidationError::BoardRequired)?;
        Ok(Self {
            board_id,
            image_url: image_url.to_string(),
            title: non_blank(title),
            link_url: non_blank(link_url),
            note: non_blank(note),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
