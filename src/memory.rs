//! In-memory repositories for tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::{DuplicateEmail, UserRepository},
        repo_types::User,
    },
    boards::{
        repo::BoardRepository,
        repo_types::{Board, NewBoard},
    },
    pins::{
        repo::{BoardNotFound, PinRepository},
        repo_types::{BoardRef, NewPin, Pin},
    },
};

/// Rows are kept in insertion order, so listing in reverse is newest first.
#[derive(Default)]
struct Inner {
    users: Vec<User>,
    boards: Vec<Board>,
    pins: Vec<Pin>,
    calls: usize,
    fail_next: Option<String>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of board/pin calls made so far.
    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    /// Make the next board/pin call fail with `message`.
    pub fn fail_next(&self, message: &str) {
        self.inner.lock().unwrap().fail_next = Some(message.to_string());
    }

    fn data_call(&self) -> anyhow::Result<MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if let Some(message) = inner.fail_next.take() {
            anyhow::bail!(message);
        }
        Ok(inner)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == email) {
            anyhow::bail!(DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Board>> {
        let inner = self.data_call()?;
        Ok(inner
            .boards
            .iter()
            .rev()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<Option<Board>> {
        let inner = self.data_call()?;
        Ok(inner
            .boards
            .iter()
            .find(|b| b.id == board_id && b.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, user_id: Uuid, board: NewBoard) -> anyhow::Result<Board> {
        let mut inner = self.data_call()?;
        let row = Board {
            id: Uuid::new_v4(),
            user_id,
            title: board.title().to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.boards.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<bool> {
        let mut inner = self.data_call()?;
        let before = inner.boards.len();
        inner
            .boards
            .retain(|b| !(b.id == board_id && b.user_id == user_id));
        let deleted = inner.boards.len() != before;
        if deleted {
            inner.pins.retain(|p| p.board_id != board_id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl PinRepository for MemoryStore {
    async fn list_feed(&self, user_id: Uuid) -> anyhow::Result<Vec<Pin>> {
        let inner = self.data_call()?;
        Ok(inner
            .pins
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .filter_map(|p| {
                let board = inner.boards.iter().find(|b| b.id == p.board_id)?;
                Some(Pin {
                    board: Some(BoardRef {
                        id: board.id,
                        title: board.title.clone(),
                    }),
                    ..p.clone()
                })
            })
            .collect())
    }

    async fn list_by_board(&self, user_id: Uuid, board_id: Uuid) -> anyhow::Result<Vec<Pin>> {
        let inner = self.data_call()?;
        Ok(inner
            .pins
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id && p.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, user_id: Uuid, pin: NewPin) -> anyhow::Result<Pin> {
        let mut inner = self.data_call()?;
        let Some(board) = inner
            .boards
            .iter()
            .find(|b| b.id == pin.board_id && b.user_id == user_id)
        else {
            anyhow::bail!(BoardNotFound);
        };
        let board = BoardRef {
            id: board.id,
            title: board.title.clone(),
        };
        let row = Pin {
            id: Uuid::new_v4(),
            user_id,
            board_id: pin.board_id,
            image_url: pin.image_url,
            title: pin.title,
            link_url: pin.link_url,
            note: pin.note,
            created_at: OffsetDateTime::now_utc(),
            board: None,
        };
        inner.pins.push(row.clone());
        Ok(Pin {
            board: Some(board),
            ..row
        })
    }

    async fn delete(&self, user_id: Uuid, pin_id: Uuid) -> anyhow::Result<bool> {
        let mut inner = self.data_call()?;
        let before = inner.pins.len();
        inner
            .pins
            .retain(|p| !(p.id == pin_id && p.user_id == user_id));
        Ok(inner.pins.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deleting_a_board_cascades_to_its_pins() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let keep = BoardRepository::insert(&store, user, NewBoard::new("Keep").unwrap())
            .await
            .unwrap();
        let drop = BoardRepository::insert(&store, user, NewBoard::new("Drop").unwrap())
            .await
            .unwrap();
        for board in [&keep, &drop] {
            let pin = NewPin::new(Some(board.id), "https://img/x.png", "", "", "").unwrap();
            PinRepository::insert(&store, user, pin).await.unwrap();
        }

        assert!(BoardRepository::delete(&store, user, drop.id).await.unwrap());
        let feed = store.list_feed(user).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].board_id, keep.id);

        // second delete of the same id is a no-op
        assert!(!BoardRepository::delete(&store, user, drop.id).await.unwrap());
    }

    #[tokio::test]
    async fn rows_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let board = BoardRepository::insert(&store, alice, NewBoard::new("Mine").unwrap())
            .await
            .unwrap();

        assert!(store.list_by_user(bob).await.unwrap().is_empty());
        assert!(store.find(bob, board.id).await.unwrap().is_none());
        let pin = NewPin::new(Some(board.id), "https://img/x.png", "", "", "").unwrap();
        let err = PinRepository::insert(&store, bob, pin).await.unwrap_err();
        assert!(err.downcast_ref::<BoardNotFound>().is_some());
        assert_eq!(err.to_string(), "Board not found");
    }

    #[tokio::test]
    async fn fail_next_fails_once_and_counts_calls() {
        let store = MemoryStore::new();
        store.fail_next("connection reset");
        let err = store.list_by_user(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
        assert!(store.list_by_user(Uuid::new_v4()).await.is_ok());
        assert_eq!(store.calls(), 2);
    }
}
