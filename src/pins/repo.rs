use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewPin, Pin, PinRow};

/// The target board does not exist or belongs to someone else.
#[derive(Debug, thiserror::Error)]
#[error("Board not found")]
pub struct BoardNotFound;

#[async_trait]
pub trait PinRepository: Send + Sync {
    /// Every pin of a user with its board projection, newest first.
    async fn list_feed(&self, user_id: Uuid) -> anyhow::Result<Vec<Pin>>;

    /// Pins of one board, newest first.
    async fn list_by_board(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<Vec<Pin>>;

    /// Fails with [`BoardNotFound`] when the board is missing or not owned by the user.
    async fn insert(&self, user_id: Uuid, pin: NewPin) -> anyhow::Result<Pin>;

    async fn delete(&self, user_id: Uuid, pin_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgPinRepository {
    db: PgPool,
}

impl PgPinRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PinRepository for PgPinRepository {
    async fn list_feed(&self, user_id: Uuid) -> anyhow::Result<Vec<Pin>> {
        let rows = sqlx::query_as::<_, PinRow>(
            r#"
            SELECT p.id, p.user_id, p.board_id, p.image_url, p.title, p.link_url, p.note,
                   p.created_at, b.title AS board_title
              FROM pins p
              JOIN boards b ON b.id = p.board_id
             WHERE p.user_id = $1
             ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list feed pins")?;
        Ok(rows.into_iter().map(Pin::from).collect())
    }

    async fn list_by_board(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<Vec<Pin>> {
        let rows = sqlx::query_as::<_, PinRow>(
            r#"
            SELECT id, user_id, board_id, image_url, title, link_url, note, created_at,
                   NULL::text AS board_title
              FROM pins
             WHERE board_id = $1 AND user_id = $2
             ORDER BY created_at DESC
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list board pins")?;
        Ok(rows.into_iter().map(Pin::from).collect())
    }

    async fn insert(&self, user_id: Uuid, pin: NewPin) -> anyhow::Result<Pin> {
        let row = sqlx::query_as::<_, PinRow>(
            r#"
            WITH inserted AS (
                INSERT INTO pins (user_id, board_id, image_url, title, link_url, note)
                SELECT $1, b.id, $3, $4, $5, $6
                  FROM boards b
                 WHERE b.id = $2 AND b.user_id = $1
                RETURNING id, user_id, board_id, image_url, title, link_url, note, created_at
            )
            SELECT i.id, i.user_id, i.board_id, i.image_url, i.title, i.link_url, i.note,
                   i.created_at, b.title AS board_title
              FROM inserted i
              JOIN boards b ON b.id = i.board_id
            "#,
        )
        .bind(user_id)
        .bind(pin.board_id)
        .bind(&pin.image_url)
        .bind(&pin.title)
        .bind(&pin.link_url)
        .bind(&pin.note)
        .fetch_optional(&self.db)
        .await
        .context("insert pin")?;

        let Some(row) = row else {
            anyhow::bail!(BoardNotFound);
        };
        Ok(row.into())
    }

    async fn delete(&self, user_id: Uuid, pin_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM pins WHERE id = $1 AND user_id = $2"#)
            .bind(pin_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete pin")?;
        Ok(res.rows_affected() > 0)
    }
}
