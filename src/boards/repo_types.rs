use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ValidationError;

/// Board record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: Uuid,
    pub user_id: Uuid, // owner
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated insert payload. Only constructible through [`NewBoard::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoard {
    title: String,
}

impl NewBoard {
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::BoardTitleRequired);
        }
        Ok(Self {
            title: title.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}
