use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    pins::{repo::PinRepository, repo_types::Pin},
    views::{Confirmation, DeleteOutcome},
};

/// Shown in place of an image that failed to load: a 400x300 gray panel
/// reading "Image unavailable".
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22 width%3D%22400%22 height%3D%22300%22%3E%3Crect width%3D%22400%22 height%3D%22300%22 fill%3D%22%23f3f4f6%22%2F%3E%3Ctext x%3D%22200%22 y%3D%22155%22 text-anchor%3D%22middle%22 fill%3D%22%239ca3af%22 font-size%3D%2214%22%3EImage unavailable%3C%2Ftext%3E%3C%2Fsvg%3E";

#[derive(Debug, Clone, Serialize)]
pub struct PinCard {
    pub pin: Pin,
    pub alt: String,
    pub has_caption: bool,
    /// `link_url` when it is safe to put in an `href`.
    pub link_href: Option<String>,
}

impl PinCard {
    pub fn new(pin: Pin) -> Self {
        let has_caption = pin.title.is_some() || pin.note.is_some() || pin.link_url.is_some();
        let alt = pin.title.clone().unwrap_or_else(|| "Pin".to_string());
        let link_href = pin.link_url.as_deref().filter(|u| is_web_url(u)).map(str::to_owned);
        Self {
            pin,
            alt,
            has_caption,
            link_href,
        }
    }
}

fn is_web_url(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    })
}

/// Confirmed delete of one pin. On failure the returned message is what the
/// user is alerted with.
pub async fn delete_pin(
    user_id: Uuid,
    pin_id: Uuid,
    confirmation: Confirmation,
    pins: &dyn PinRepository,
) -> Result<DeleteOutcome, String> {
    if confirmation == Confirmation::Cancelled {
        return Ok(DeleteOutcome::Cancelled);
    }
    match pins.delete(user_id, pin_id).await {
        Ok(found) => {
            info!(%user_id, %pin_id, found, "pin deleted");
            Ok(DeleteOutcome::Deleted)
        }
        Err(e) => {
            warn!(%user_id, %pin_id, error = %format!("{e:#}"), "delete pin failed");
            Err(format!("Failed to delete pin: {e:#}"))
        }
    }
}
