//! # pmomusicbox - Tag-triggered music box
//!
//! Putting an NFC/RFID card on a reader starts the music assigned to it on a
//! Home Assistant media player; taking it off pauses the music, and putting
//! it back resumes it.
//!
//! - [`controller`]: the tag state machine ([`TagController`])
//! - [`volume`]: volume normalization before playback
//! - [`watcher`]: polling of the tag reader entity
//! - [`admin`]: card administration and catalog enrichment
//! - [`config_ext`]: volume and reader settings from pmoconfig
//! - [`logs`]: tracing subscriber setup

pub mod admin;
pub mod config_ext;
pub mod controller;
pub mod error;
pub mod logs;
pub mod volume;
pub mod watcher;

pub use admin::{CardUpdate, CurrentCard, MusicBoxAdmin};
pub use config_ext::MusicBoxConfigExt;
pub use controller::{
    Action, SessionSnapshot, TagController, TagState, Transition, spawn_controller_loop,
};
pub use error::{MusicBoxError, Result};
pub use volume::{VolumeBounds, ensure_volume, normalize};
pub use watcher::{Observation, TagWatcher};
