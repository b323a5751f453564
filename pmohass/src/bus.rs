//! Contract with the home-automation bus.
//!
//! Reads are explicit: [`HassBus::observe_state`] returns the entity state as
//! observed at call time, nothing is cached. Writes are fire-and-forget
//! service invocations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HassError, Result};

/// Payload of a service call (a JSON object)
pub type ServiceData = Map<String, Value>;

/// Snapshot of one entity, as returned by `GET /api/states/<entity_id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter, mostly handy for fakes.
    pub fn with_attribute(mut self, name: &str, value: Value) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Value::as_str)
    }

    pub fn attribute_f64(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(Value::as_f64)
    }

    /// Reads a list of strings; non-string items are skipped.
    pub fn attribute_list(&self, name: &str) -> Option<Vec<String>> {
        self.attribute(name).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
    }
}

/// Automation bus capability.
///
/// Implementations must be usable from the controller thread and from the
/// admin surface at the same time.
pub trait HassBus: Send + Sync {
    /// Current state of `entity_id`, `None` when the entity does not exist.
    fn observe_state(&self, entity_id: &str) -> Result<Option<EntityState>>;

    /// Invokes `service` (`"domain/service"`) with `data`.
    fn invoke_service(&self, service: &str, data: ServiceData) -> Result<()>;
}

/// Splits `"media_player/play_media"` into its domain and service parts.
pub fn split_service(service: &str) -> Result<(&str, &str)> {
    match service.split_once('/') {
        Some((domain, name))
            if !domain.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((domain, name))
        }
        _ => Err(HassError::InvalidService(service.to_string())),
    }
}
