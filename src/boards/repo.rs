use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Board, NewBoard};

/// Board persistence. Every query is scoped to the owning user.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// All boards of a user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Board>>;

    async fn find(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<Option<Board>>;

    /// Insert and return the stored row.
    async fn insert(&self, user_id: Uuid, board: NewBoard) -> anyhow::Result<Board>;

    /// Returns `false` when nothing matched (already deleted or not owned).
    async fn delete(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgBoardRepository {
    db: PgPool,
}

impl PgBoardRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BoardRepository for PgBoardRepository {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Board>> {
        let rows = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, title, created_at
              FROM boards
             WHERE user_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list boards")?;
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<Option<Board>> {
        let row = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, title, created_at
              FROM boards
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find board")?;
        Ok(row)
    }

    async fn insert(&self, user_id: Uuid, board: NewBoard) -> anyhow::Result<Board> {
        let row = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title, created_at
            "#,
        )
        .bind(user_id)
        .bind(board.title())
        .fetch_one(&self.db)
        .await
        .context("insert board")?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<bool> {
        // pins go with it through ON DELETE CASCADE
        let res = sqlx::query(r#"DELETE FROM boards WHERE id = $1 AND user_id = $2"#)
            .bind(board_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete board")?;
        Ok(res.rows_affected() > 0)
    }
}
