//! Tag-driven playback state machine.
//!
//! The controller receives the successive values of the tag reader entity and
//! turns them into player commands:
//!
//! - no tag: pause (once)
//! - `unavailable` / `unknown`: ignored
//! - a new tag whose card points to new content: prepare, set volume, play
//! - a tag whose card points to the content paused last: prepare, set volume,
//!   resume
//!
//! Removing a tag keeps the last dispatched content in memory so that putting
//! the same card back resumes playback instead of restarting it.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use pmocards::{Card, CardStore};
use pmohass::PlayerBackend;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::volume::{VolumeBounds, ensure_volume};
use crate::watcher::Observation;

/// Reader states that carry no tag information.
pub const IGNORED_STATES: [&str; 2] = ["unavailable", "unknown"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TagState {
    Idle,
    Active {
        tag: String,
        /// Content dispatched for this tag, `None` when its card is empty
        playing: Option<String>,
    },
}

/// What a transition did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Observation without effect
    Ignored,
    Paused,
    Played,
    Resumed,
    /// Known tag, but its card has nothing to play
    NoContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub action: Action,
    pub state: TagState,
    /// Player errors raised while dispatching, already logged
    pub dispatch_errors: Vec<String>,
}

/// Session data exposed to the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub current: Option<String>,
    pub playing: Option<String>,
}

pub struct TagController {
    store: CardStore,
    player: Box<dyn PlayerBackend>,
    bounds: VolumeBounds,
    current: Option<String>,
    playing: Option<String>,
}

impl TagController {
    pub fn new(store: CardStore, player: Box<dyn PlayerBackend>, bounds: VolumeBounds) -> Self {
        info!(
            player = %player.kind(),
            entity = player.base().entity(),
            "Tag controller ready"
        );
        Self {
            store,
            player,
            bounds,
            current: None,
            playing: None,
        }
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn state(&self) -> TagState {
        match &self.current {
            None => TagState::Idle,
            Some(tag) => TagState::Active {
                tag: tag.clone(),
                playing: self.playing.clone(),
            },
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current: self.current.clone(),
            playing: self.playing.clone(),
        }
    }

    /// Handles one value of the tag reader.
    ///
    /// A storage failure aborts the transition and leaves the session as it
    /// was. Player failures do not: they are logged and reported in
    /// [`Transition::dispatch_errors`].
    pub fn on_observation(&mut self, observation: Option<&str>) -> Result<Transition> {
        let value = observation.map(str::trim).unwrap_or_default();
        debug!(observation = value, "Tag reader changed");

        if value.is_empty() {
            return Ok(self.removed());
        }
        if IGNORED_STATES.contains(&value) {
            debug!(observation = value, "Ignoring reader state");
            return Ok(self.transition(Action::Ignored, Vec::new()));
        }
        if self.current.as_deref() == Some(value) {
            return Ok(self.transition(Action::Ignored, Vec::new()));
        }

        let card = self.store.get(value)?;
        info!(tag = value, title = ?card.title, content = ?card.content_id, "Tag appeared");
        self.current = Some(value.to_string());

        Ok(self.appeared(&card))
    }

    /// Pauses and forgets the session: the next tag always starts afresh.
    pub fn stop(&mut self) -> Transition {
        let mut errors = Vec::new();
        if self.current.is_some() || self.playing.is_some() {
            dispatch(&mut errors, "pause", self.player.pause());
        }
        self.current = None;
        self.playing = None;
        info!("Playback session cleared");
        self.transition(Action::Paused, errors)
    }

    fn removed(&mut self) -> Transition {
        if self.current.take().is_none() {
            return self.transition(Action::Ignored, Vec::new());
        }

        info!("Tag removed");
        let mut errors = Vec::new();
        dispatch(&mut errors, "pause", self.player.pause());
        self.transition(Action::Paused, errors)
    }

    fn appeared(&mut self, card: &Card) -> Transition {
        let content = card.content_id.clone().filter(|c| !c.is_empty());
        let mut errors = Vec::new();

        if self.playing.is_some() && self.playing == content {
            info!(content = ?content, "Resuming playback");
            self.setup(&mut errors);
            dispatch(&mut errors, "resume", self.player.resume());
            return self.transition(Action::Resumed, errors);
        }

        self.playing = None;
        if content.is_none() {
            info!(tag = %card.id, "Card has nothing to play");
            return self.transition(Action::NoContent, errors);
        }

        info!(content = ?content, shuffle = card.shuffle, "Starting playback");
        self.setup(&mut errors);
        dispatch(&mut errors, "play", self.player.play(card));
        self.playing = content;
        self.transition(Action::Played, errors)
    }

    fn setup(&self, errors: &mut Vec<String>) {
        dispatch(errors, "prepare", self.player.prepare());
        dispatch(
            errors,
            "volume",
            ensure_volume(self.player.as_ref(), &self.bounds).map(|_| ()),
        );
    }

    fn transition(&self, action: Action, dispatch_errors: Vec<String>) -> Transition {
        Transition {
            action,
            state: self.state(),
            dispatch_errors,
        }
    }
}

/// Feeds observations to the controller, one at a time, until the channel
/// closes.
pub fn spawn_controller_loop(
    controller: Arc<Mutex<TagController>>,
    rx: Receiver<Observation>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("musicbox-controller".into())
        .spawn(move || {
            for observation in rx.iter() {
                let mut guard = match controller.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                match guard.on_observation(observation.as_deref()) {
                    Ok(transition) => debug!(?transition, "Transition applied"),
                    Err(e) => error!(error = %e, "Observation not handled"),
                }
            }
            info!("Observation channel closed, controller loop exiting");
        })
}

fn dispatch(errors: &mut Vec<String>, step: &str, result: pmohass::Result<()>) {
    if let Err(e) = result {
        warn!(step, error = %e, "Player command failed");
        errors.push(format!("{}: {}", step, e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serialization() {
        let state = TagState::Active {
            tag: "04a1".to_string(),
            playing: None,
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"state": "active", "tag": "04a1", "playing": null})
        );
        assert_eq!(
            serde_json::to_value(TagState::Idle).unwrap(),
            serde_json::json!({"state": "idle"})
        );
    }
}
