use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use pmohass::{EntityState, HassBus, HassError, Result, ServiceData};
use serde_json::Value;

/// In-memory bus: states are set by the test, service calls are recorded.
/// Entities marked as failing answer every read and call with an error.
#[derive(Default)]
pub struct RecordingBus {
    states: Mutex<HashMap<String, EntityState>>,
    calls: Mutex<Vec<(String, ServiceData)>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingBus {
    pub fn set_state(&self, state: EntityState) {
        self.states
            .lock()
            .unwrap()
            .insert(state.entity_id.clone(), state);
    }

    pub fn set_volume(&self, entity_id: &str, volume: f64) {
        self.set_state(
            EntityState::new(entity_id, "idle").with_attribute("volume_level", volume.into()),
        );
    }

    pub fn fail_entity(&self, entity_id: &str) {
        self.failing.lock().unwrap().insert(entity_id.to_string());
    }

    fn check(&self, entity_id: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(entity_id) {
            return Err(HassError::Remote {
                code: 500,
                message: format!("{} is unreachable", entity_id),
            });
        }
        Ok(())
    }

    pub fn calls(&self) -> Vec<(String, ServiceData)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn services(&self) -> Vec<String> {
        self.calls().into_iter().map(|(s, _)| s).collect()
    }

    pub fn field(data: &ServiceData, key: &str) -> Value {
        data.get(key).cloned().unwrap_or(Value::Null)
    }
}

impl HassBus for RecordingBus {
    fn observe_state(&self, entity_id: &str) -> Result<Option<EntityState>> {
        self.check(entity_id)?;
        Ok(self.states.lock().unwrap().get(entity_id).cloned())
    }

    fn invoke_service(&self, service: &str, data: ServiceData) -> Result<()> {
        let target = data.get("entity_id").and_then(Value::as_str).map(str::to_string);
        self.calls.lock().unwrap().push((service.to_string(), data));
        match target {
            Some(entity_id) => self.check(&entity_id),
            None => Ok(()),
        }
    }
}
