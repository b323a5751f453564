//! Home Assistant settings as a pmoconfig extension
//!
//! ```yaml
//! hass:
//!   base_url: http://homeassistant.local:8123
//!   token: "<long-lived access token>"
//!   timeout_secs: 10
//! player:
//!   kind: sonos            # default | generic | spotify | sonos
//!   entity: media_player.living_room
//!   group: [media_player.kitchen]
//!   source: "Living Room"  # spotify only
//! ```

use std::time::Duration;

use anyhow::{Result, anyhow};
use pmoconfig::Config;

use crate::players::{PlayerConfig, PlayerKind};
use crate::rest::{DEFAULT_TIMEOUT, HassRestClient};

/// Extension trait for the Home Assistant connection and the driven player
pub trait HassConfigExt {
    fn get_hass_base_url(&self) -> Result<String>;
    fn get_hass_token(&self) -> Result<String>;
    fn get_hass_timeout(&self) -> Duration;

    /// Player description (`player.*`)
    fn get_player_config(&self) -> Result<PlayerConfig>;

    /// Builds the REST client from `hass.*`
    fn build_hass_client(&self) -> Result<HassRestClient>;
}

impl HassConfigExt for Config {
    fn get_hass_base_url(&self) -> Result<String> {
        self.get_string(&["hass", "base_url"])
            .ok_or_else(|| anyhow!("hass.base_url is not configured"))
    }

    fn get_hass_token(&self) -> Result<String> {
        self.get_string(&["hass", "token"])
            .ok_or_else(|| anyhow!("hass.token is not configured"))
    }

    fn get_hass_timeout(&self) -> Duration {
        self.get_u64(&["hass", "timeout_secs"])
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn get_player_config(&self) -> Result<PlayerConfig> {
        let kind: PlayerKind = self
            .get_string(&["player", "kind"])
            .map(|k| k.parse::<PlayerKind>())
            .transpose()?
            .unwrap_or_default();
        let entity = self
            .get_string(&["player", "entity"])
            .ok_or_else(|| anyhow!("player.entity is not configured"))?;

        Ok(PlayerConfig {
            kind,
            entity,
            group: self.get_string_list(&["player", "group"]),
            source: self.get_string(&["player", "source"]),
        })
    }

    fn build_hass_client(&self) -> Result<HassRestClient> {
        let client = HassRestClient::new(
            &self.get_hass_base_url()?,
            &self.get_hass_token()?,
            self.get_hass_timeout(),
        )?;
        Ok(client)
    }
}
