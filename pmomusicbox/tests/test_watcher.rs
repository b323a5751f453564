mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeBus, READER};
use pmohass::HassBus;
use pmomusicbox::TagWatcher;

const POLL: Duration = Duration::from_millis(5);
const WAIT: Duration = Duration::from_secs(2);

fn watch(bus: &Arc<FakeBus>) -> (TagWatcher, crossbeam_channel::Receiver<Option<String>>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let bus: Arc<dyn HassBus> = bus.clone();
    let watcher = TagWatcher::spawn(bus, READER, POLL, tx).unwrap();
    (watcher, rx)
}

#[test]
fn test_initial_value_and_changes_are_emitted() {
    let bus = Arc::new(FakeBus::default());
    bus.queue(
        READER,
        vec![Ok(Some("")), Ok(Some("")), Ok(Some("04a1")), Ok(Some("04a1")), Ok(Some(""))],
    );
    let (mut watcher, rx) = watch(&bus);

    assert_eq!(rx.recv_timeout(WAIT).unwrap(), None);
    assert_eq!(rx.recv_timeout(WAIT).unwrap().as_deref(), Some("04a1"));
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), None);

    watcher.stop();
    // the last value sticks: nothing else is emitted
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_read_errors_keep_previous_value() {
    let bus = Arc::new(FakeBus::default());
    bus.queue(
        READER,
        vec![Ok(Some("04a1")), Err(()), Ok(None), Ok(Some("04a1")), Ok(Some("unavailable"))],
    );
    let (mut watcher, rx) = watch(&bus);

    assert_eq!(rx.recv_timeout(WAIT).unwrap().as_deref(), Some("04a1"));
    assert_eq!(
        rx.recv_timeout(WAIT).unwrap().as_deref(),
        Some("unavailable")
    );

    watcher.stop();
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_stop_closes_the_channel() {
    let bus = Arc::new(FakeBus::default());
    bus.queue(READER, vec![Ok(Some("04a1"))]);
    let (mut watcher, rx) = watch(&bus);

    assert!(rx.recv_timeout(WAIT).is_ok());
    watcher.stop();

    assert!(rx.recv_timeout(WAIT).is_err());
}
