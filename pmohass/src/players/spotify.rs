use pmocards::Card;
use serde_json::json;
use tracing::info;

use super::{GenericPlayer, MediaAddress, PlayerBackend, PlayerKind};
use crate::error::Result;

/// Media player fed by a Spotify source (Spotify Connect device).
///
/// The configured source is selected before playback when the player is on
/// another one, and every card is sent as a `playlist`.
#[derive(Debug, Clone)]
pub struct SpotifyPlayer {
    base: GenericPlayer,
    source: String,
}

impl SpotifyPlayer {
    pub fn new(base: GenericPlayer, source: impl Into<String>) -> Self {
        Self {
            base,
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PlayerBackend for SpotifyPlayer {
    fn base(&self) -> &GenericPlayer {
        &self.base
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Spotify
    }

    fn prepare(&self) -> Result<()> {
        let current = self
            .base
            .state_of(self.base.entity())?
            .and_then(|s| s.attribute_str("source").map(str::to_string));

        if current.as_deref() == Some(self.source.as_str()) {
            return Ok(());
        }

        info!(
            entity = self.base.entity(),
            current = ?current,
            desired = %self.source,
            "Selecting player source"
        );
        self.base
            .call("media_player/select_source", json!({ "source": self.source }))
    }

    fn media_address(&self, card: &Card) -> Option<MediaAddress> {
        GenericPlayer::address_of(card).map(|address| MediaAddress {
            content_type: Some("playlist".to_string()),
            ..address
        })
    }
}
