//! View state for the pages: what each grid, card and modal holds and how it
//! changes in response to store results. Rendering lives in `pages`.
//!
//! Local state only ever changes after the store has confirmed the operation.

pub mod boards;
pub mod feed;
pub mod forms;
pub mod navbar;
pub mod pin_card;

/// Outcome of an interactive confirm dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Cancelled
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user backed out; nothing was sent to the store.
    Cancelled,
    Deleted,
}
