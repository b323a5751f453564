#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use pmocards::{Card, CardStore};
use pmohass::{
    EntityState, HassBus, HassError, PlayerConfig, PlayerKind, Result, ServiceData, build_player,
};
use pmomusicbox::{TagController, VolumeBounds};
use serde_json::Value;
use tempfile::TempDir;

pub const PLAYER: &str = "media_player.living_room";
pub const READER: &str = "sensor.tag_reader";

/// Bus double: states are scripted, service calls are recorded.
///
/// A queued reader value is consumed by each read of that entity; the last
/// one sticks.
#[derive(Default)]
pub struct FakeBus {
    states: Mutex<HashMap<String, EntityState>>,
    queued: Mutex<HashMap<String, VecDeque<std::result::Result<Option<String>, ()>>>>,
    calls: Mutex<Vec<(String, ServiceData)>>,
    fail_services: Mutex<bool>,
}

impl FakeBus {
    pub fn set_volume(&self, entity_id: &str, volume: f64) {
        self.states.lock().unwrap().insert(
            entity_id.to_string(),
            EntityState::new(entity_id, "playing").with_attribute("volume_level", volume.into()),
        );
    }

    /// Queues the next values read from `entity_id`; `Err(())` is a read failure.
    pub fn queue(&self, entity_id: &str, values: Vec<std::result::Result<Option<&str>, ()>>) {
        let mut queued = self.queued.lock().unwrap();
        let entry = queued.entry(entity_id.to_string()).or_default();
        for value in values {
            entry.push_back(value.map(|v| v.map(str::to_string)));
        }
    }

    pub fn fail_services(&self, fail: bool) {
        *self.fail_services.lock().unwrap() = fail;
    }

    pub fn services(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(s, _)| s.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<(String, ServiceData)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl HassBus for FakeBus {
    fn observe_state(&self, entity_id: &str) -> Result<Option<EntityState>> {
        {
            let mut queued = self.queued.lock().unwrap();
            if let Some(values) = queued.get_mut(entity_id) {
                let value = if values.len() > 1 {
                    values.pop_front()
                } else {
                    values.front().cloned()
                };
                if let Some(value) = value {
                    return match value {
                        Ok(Some(state)) => Ok(Some(EntityState::new(entity_id, state))),
                        Ok(None) => Ok(None),
                        Err(()) => Err(HassError::Remote {
                            code: 500,
                            message: "reader offline".to_string(),
                        }),
                    };
                }
            }
        }
        Ok(self.states.lock().unwrap().get(entity_id).cloned())
    }

    fn invoke_service(&self, service: &str, data: ServiceData) -> Result<()> {
        self.calls.lock().unwrap().push((service.to_string(), data));
        if *self.fail_services.lock().unwrap() {
            return Err(HassError::Remote {
                code: 502,
                message: "bad gateway".to_string(),
            });
        }
        Ok(())
    }
}

pub fn field(data: &ServiceData, key: &str) -> Value {
    data.get(key).cloned().unwrap_or(Value::Null)
}

pub struct Fixture {
    pub dir: TempDir,
    pub store: CardStore,
    pub bus: Arc<FakeBus>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = CardStore::open(dir.path().join("music.db")).unwrap();
        Self {
            dir,
            store,
            bus: Arc::new(FakeBus::default()),
        }
    }

    pub fn card(&self, id: &str, content_id: Option<&str>) -> Card {
        let mut card = Card::new(id);
        card.content_id = content_id.map(str::to_string);
        card.content_type = Some("playlist".to_string());
        self.store.store(&card).unwrap();
        card
    }

    pub fn controller(&self, bounds: VolumeBounds) -> TagController {
        let bus: Arc<dyn HassBus> = self.bus.clone();
        let player = build_player(&PlayerConfig::new(PlayerKind::Generic, PLAYER), bus).unwrap();
        TagController::new(self.store.clone(), player, bounds)
    }
}
