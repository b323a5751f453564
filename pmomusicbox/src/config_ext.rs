//! Music box settings as a pmoconfig extension
//!
//! ```yaml
//! player:
//!   volume:
//!     default: 0.3
//!     min: 0.1
//!     max: 0.6
//! tags:
//!   entity: sensor.tag_reader
//!   poll_interval_ms: 500
//! ```

use std::time::Duration;

use anyhow::{Result, anyhow};
use pmoconfig::Config;

use crate::volume::VolumeBounds;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Extension trait for the volume policy and the tag reader
pub trait MusicBoxConfigExt {
    /// Volume bounds; missing values stay `None`
    fn get_volume_bounds(&self) -> VolumeBounds;

    /// Tag reader entity
    fn get_tag_entity(&self) -> Result<String>;

    /// Tag reader polling period
    fn get_poll_interval(&self) -> Duration;
}

impl MusicBoxConfigExt for Config {
    fn get_volume_bounds(&self) -> VolumeBounds {
        VolumeBounds {
            default: self.get_f64(&["player", "volume", "default"]),
            min: self.get_f64(&["player", "volume", "min"]),
            max: self.get_f64(&["player", "volume", "max"]),
        }
    }

    fn get_tag_entity(&self) -> Result<String> {
        self.get_string(&["tags", "entity"])
            .ok_or_else(|| anyhow!("tags.entity is not configured"))
    }

    fn get_poll_interval(&self) -> Duration {
        self.get_u64(&["tags", "poll_interval_ms"])
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }
}
