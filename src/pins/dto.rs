use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePinRequest {
    pub board_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link_url: String,
    #[serde(default)]
    pub note: String,
}

/// `GET /pins` lists the whole feed unless narrowed to one board.
#[derive(Debug, Default, Deserialize)]
pub struct PinFilter {
    pub board_id: Option<Uuid>,
}
