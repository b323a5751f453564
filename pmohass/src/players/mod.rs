//! Playback targets driven through the automation bus.
//!
//! [`PlayerBackend`] is the capability the tag controller talks to. The three
//! variants share the media-player behaviour of [`GenericPlayer`]: each
//! variant holds one and the trait's default methods delegate to it, so a
//! variant only overrides what it changes (source selection, grouping,
//! volume over several speakers).

mod generic;
mod sonos;
mod spotify;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use pmocards::Card;

use crate::bus::HassBus;
use crate::error::{HassError, Result};

pub use generic::GenericPlayer;
pub use sonos::SonosPlayer;
pub use spotify::SpotifyPlayer;

/// What `media_player/play_media` receives for a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAddress {
    pub content_id: String,
    pub content_type: Option<String>,
}

pub trait PlayerBackend: Send + Sync {
    /// Shared media-player implementation.
    fn base(&self) -> &GenericPlayer;

    fn kind(&self) -> PlayerKind;

    /// Pre-play setup; only issues calls when the observed state differs
    /// from the desired one.
    fn prepare(&self) -> Result<()> {
        Ok(())
    }

    fn media_address(&self, card: &Card) -> Option<MediaAddress> {
        GenericPlayer::address_of(card)
    }

    /// Sets shuffle, then starts the card's content.
    fn play(&self, card: &Card) -> Result<()> {
        let address = self
            .media_address(card)
            .ok_or_else(|| HassError::NothingToPlay(card.id.clone()))?;
        self.base().play_address(card.shuffle, &address)
    }

    fn pause(&self) -> Result<()> {
        self.base().pause_media()
    }

    fn resume(&self) -> Result<()> {
        self.base().resume_media()
    }

    fn volume(&self) -> Result<f64> {
        let base = self.base();
        Ok(base.volume_of(base.entity())?.unwrap_or(0.0))
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        let base = self.base();
        base.set_volume_of(base.entity(), volume)
    }
}

/// Player variant selected by `player.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerKind {
    #[default]
    Generic,
    Spotify,
    Sonos,
}

impl FromStr for PlayerKind {
    type Err = HassError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "generic" => Ok(PlayerKind::Generic),
            "spotify" => Ok(PlayerKind::Spotify),
            "sonos" => Ok(PlayerKind::Sonos),
            other => Err(HassError::configuration(format!(
                "unknown player kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerKind::Generic => "default",
            PlayerKind::Spotify => "spotify",
            PlayerKind::Sonos => "sonos",
        };
        f.write_str(name)
    }
}

/// Static description of the playback target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerConfig {
    pub kind: PlayerKind,
    /// Primary media player entity
    pub entity: String,
    /// Speakers joined to the primary one (Sonos)
    pub group: Vec<String>,
    /// Source to select before playing (Spotify)
    pub source: Option<String>,
}

impl PlayerConfig {
    pub fn new(kind: PlayerKind, entity: impl Into<String>) -> Self {
        Self {
            kind,
            entity: entity.into(),
            ..Default::default()
        }
    }
}

/// Builds the backend described by `config` on top of `bus`.
pub fn build_player(config: &PlayerConfig, bus: Arc<dyn HassBus>) -> Result<Box<dyn PlayerBackend>> {
    if config.entity.trim().is_empty() {
        return Err(HassError::configuration("player entity is required"));
    }

    let base = GenericPlayer::new(config.entity.clone(), bus);

    Ok(match config.kind {
        PlayerKind::Generic => Box::new(base),
        PlayerKind::Spotify => {
            let source = config
                .source
                .clone()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| HassError::configuration("spotify player requires a source"))?;
            Box::new(SpotifyPlayer::new(base, source))
        }
        PlayerKind::Sonos => Box::new(SonosPlayer::new(base, config.group.clone())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_kind_from_str() {
        assert_eq!("default".parse::<PlayerKind>().unwrap(), PlayerKind::Generic);
        assert_eq!("generic".parse::<PlayerKind>().unwrap(), PlayerKind::Generic);
        assert_eq!("Spotify".parse::<PlayerKind>().unwrap(), PlayerKind::Spotify);
        assert_eq!("sonos".parse::<PlayerKind>().unwrap(), PlayerKind::Sonos);
        assert!("chromecast".parse::<PlayerKind>().is_err());
    }

    #[test]
    fn test_player_kind_display_round_trips() {
        for kind in [PlayerKind::Generic, PlayerKind::Spotify, PlayerKind::Sonos] {
            assert_eq!(kind.to_string().parse::<PlayerKind>().unwrap(), kind);
        }
    }
}
