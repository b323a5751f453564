//! Polling of the tag reader entity.
//!
//! The bus only offers explicit state reads, so a dedicated thread reads the
//! reader entity at a fixed interval and forwards every change on a channel.
//! The first value read is always forwarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use pmohass::HassBus;
use tracing::{debug, info, warn};

/// Value reported by the reader; `None` stands for an empty reader.
pub type Observation = Option<String>;

pub struct TagWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TagWatcher {
    /// Starts polling `entity_id` every `interval`.
    pub fn spawn(
        bus: Arc<dyn HassBus>,
        entity_id: impl Into<String>,
        interval: Duration,
        tx: Sender<Observation>,
    ) -> std::io::Result<Self> {
        let entity_id = entity_id.into();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("musicbox-tag-watcher".into())
            .spawn(move || {
                info!(entity = %entity_id, ?interval, "Watching tag reader");
                let mut last: Option<Observation> = None;

                while !stop_for_thread.load(Ordering::Relaxed) {
                    if let Some(value) = read(bus.as_ref(), &entity_id) {
                        if last.as_ref() != Some(&value) {
                            debug!(entity = %entity_id, old = ?last, new = ?value, "Tag reader changed");
                            if tx.send(value.clone()).is_err() {
                                warn!("Observation channel closed, tag watcher exiting");
                                break;
                            }
                            last = Some(value);
                        }
                    }
                    thread::sleep(interval);
                }

                info!(entity = %entity_id, "Tag watcher stopped");
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Asks the thread to stop and waits for it.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Tag watcher thread panicked");
            }
        }
    }
}

impl Drop for TagWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One read of the reader; `None` when the read failed or the entity is
/// missing, in which case the previous value stands.
fn read(bus: &dyn HassBus, entity_id: &str) -> Option<Observation> {
    match bus.observe_state(entity_id) {
        Ok(Some(state)) => {
            let value = state.state.trim();
            Some((!value.is_empty()).then(|| value.to_string()))
        }
        Ok(None) => {
            warn!(entity = entity_id, "Tag reader entity not found");
            None
        }
        Err(e) => {
            warn!(entity = entity_id, error = %e, "Failed to read tag reader");
            None
        }
    }
}
