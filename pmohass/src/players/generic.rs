use std::sync::Arc;

use pmocards::Card;
use serde_json::{Value, json};
use tracing::debug;

use super::{MediaAddress, PlayerBackend, PlayerKind};
use crate::bus::{EntityState, HassBus, ServiceData};
use crate::error::Result;

/// Plain `media_player` entity: content id and type are passed through.
#[derive(Clone)]
pub struct GenericPlayer {
    entity: String,
    bus: Arc<dyn HassBus>,
}

impl std::fmt::Debug for GenericPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericPlayer")
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

impl GenericPlayer {
    pub fn new(entity: impl Into<String>, bus: Arc<dyn HassBus>) -> Self {
        Self {
            entity: entity.into(),
            bus,
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn bus(&self) -> &dyn HassBus {
        self.bus.as_ref()
    }

    pub fn state_of(&self, entity_id: &str) -> Result<Option<EntityState>> {
        let state = self.bus.observe_state(entity_id)?;
        debug!(entity_id, state = ?state.as_ref().map(|s| &s.state), "Observed state");
        Ok(state)
    }

    /// Calls `service` with `entity_id` set to `entity_id` plus `extra` fields.
    pub fn call_on(&self, entity_id: &str, service: &str, extra: Value) -> Result<()> {
        let mut data = ServiceData::new();
        data.insert("entity_id".to_string(), Value::String(entity_id.to_string()));
        if let Value::Object(fields) = extra {
            data.extend(fields);
        }
        self.bus.invoke_service(service, data)
    }

    /// [`GenericPlayer::call_on`] targeting the primary entity.
    pub fn call(&self, service: &str, extra: Value) -> Result<()> {
        self.call_on(&self.entity, service, extra)
    }

    pub fn address_of(card: &Card) -> Option<MediaAddress> {
        if !card.has_content() {
            return None;
        }
        Some(MediaAddress {
            content_id: card.content_id.clone()?,
            content_type: card.content_type.clone(),
        })
    }

    pub fn play_address(&self, shuffle: bool, address: &MediaAddress) -> Result<()> {
        self.call("media_player/shuffle_set", json!({ "shuffle": shuffle }))?;
        self.call(
            "media_player/play_media",
            json!({
                "media_content_id": address.content_id,
                "media_content_type": address.content_type,
            }),
        )
    }

    pub fn pause_media(&self) -> Result<()> {
        self.call("media_player/media_pause", Value::Null)
    }

    pub fn resume_media(&self) -> Result<()> {
        self.call("media_player/media_play", Value::Null)
    }

    /// `volume_level` attribute of `entity_id`; `None` when unknown.
    pub fn volume_of(&self, entity_id: &str) -> Result<Option<f64>> {
        Ok(self
            .state_of(entity_id)?
            .and_then(|s| s.attribute_f64("volume_level")))
    }

    pub fn set_volume_of(&self, entity_id: &str, volume: f64) -> Result<()> {
        self.call_on(
            entity_id,
            "media_player/volume_set",
            json!({ "volume_level": volume }),
        )
    }
}

impl PlayerBackend for GenericPlayer {
    fn base(&self) -> &GenericPlayer {
        self
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Generic
    }
}
