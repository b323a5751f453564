use std::collections::BTreeSet;

use pmocards::Card;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{GenericPlayer, MediaAddress, PlayerBackend, PlayerKind};
use crate::error::Result;

/// Sonos speaker, optionally grouped with other speakers.
///
/// The group is (re)joined before playback when the observed membership
/// differs. Without a configured group the speaker is left as is: an
/// existing group is never split.
#[derive(Debug, Clone)]
pub struct SonosPlayer {
    base: GenericPlayer,
    group: Vec<String>,
}

impl SonosPlayer {
    pub fn new(base: GenericPlayer, group: Vec<String>) -> Self {
        Self { base, group }
    }

    /// Primary entity followed by the group members.
    pub fn members(&self) -> Vec<&str> {
        std::iter::once(self.base.entity())
            .chain(self.group.iter().map(String::as_str))
            .collect()
    }
}

impl PlayerBackend for SonosPlayer {
    fn base(&self) -> &GenericPlayer {
        &self.base
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Sonos
    }

    fn prepare(&self) -> Result<()> {
        if self.group.is_empty() {
            debug!(entity = self.base.entity(), "No speaker group configured");
            return Ok(());
        }

        let observed: BTreeSet<String> = self
            .base
            .state_of(self.base.entity())?
            .and_then(|s| s.attribute_list("group_members"))
            .unwrap_or_default()
            .into_iter()
            .collect();
        let desired: BTreeSet<String> = self.members().into_iter().map(str::to_string).collect();

        if observed == desired {
            return Ok(());
        }

        info!(
            entity = self.base.entity(),
            group = ?self.group,
            "Grouping speakers"
        );
        self.base
            .call("media_player/join", json!({ "group_members": self.group }))
    }

    fn media_address(&self, card: &Card) -> Option<MediaAddress> {
        GenericPlayer::address_of(card).map(|address| MediaAddress {
            content_type: Some("music".to_string()),
            ..address
        })
    }

    /// Loudest member; members without a reading are skipped.
    ///
    /// A member whose read fails is skipped too; the call only fails when
    /// every member failed.
    fn volume(&self) -> Result<f64> {
        let mut volume = 0.0_f64;
        let mut first_error = None;
        let mut read = 0;

        for member in self.members() {
            match self.base.volume_of(member) {
                Ok(level) => {
                    read += 1;
                    if let Some(level) = level {
                        volume = volume.max(level);
                    }
                }
                Err(e) => {
                    warn!(entity = member, error = %e, "Volume read failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if read == 0 => Err(e),
            _ => Ok(volume),
        }
    }

    /// Writes every member, even after a failure, then reports the first one.
    fn set_volume(&self, volume: f64) -> Result<()> {
        let mut first_error = None;
        for member in self.members() {
            if let Err(e) = self.base.set_volume_of(member, volume) {
                warn!(entity = member, error = %e, "Volume write failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
