//! # pmohass - Home Assistant playback backends
//!
//! This crate drives media players through a Home Assistant instance:
//!
//! - [`HassBus`]: the bus contract (typed state reads, service calls)
//! - [`HassRestClient`]: its REST implementation
//! - [`PlayerBackend`] and its variants [`GenericPlayer`], [`SpotifyPlayer`]
//!   and [`SonosPlayer`]
//! - [`HassConfigExt`]: connection and player settings from pmoconfig
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pmohass::{HassRestClient, PlayerConfig, PlayerKind, build_player};
//!
//! let bus = Arc::new(HassRestClient::new(
//!     "http://homeassistant.local:8123",
//!     "token",
//!     Duration::from_secs(10),
//! )?);
//! let mut config = PlayerConfig::new(PlayerKind::Sonos, "media_player.living_room");
//! config.group = vec!["media_player.kitchen".to_string()];
//!
//! let player = build_player(&config, bus)?;
//! player.prepare()?;
//! println!("volume: {}", player.volume()?);
//! # Ok::<(), pmohass::HassError>(())
//! ```

pub mod bus;
pub mod config_ext;
pub mod error;
pub mod players;
pub mod rest;

pub use bus::{EntityState, HassBus, ServiceData};
pub use config_ext::HassConfigExt;
pub use error::{HassError, Result};
pub use players::{
    GenericPlayer, MediaAddress, PlayerBackend, PlayerConfig, PlayerKind, SonosPlayer,
    SpotifyPlayer, build_player,
};
pub use rest::HassRestClient;
