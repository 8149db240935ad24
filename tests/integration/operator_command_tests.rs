//! Integration tests for operator commands: annotate, delete, snapshot,
//! manual entry, export.

use std::fs;

use sirenlog::Error;
use sirenlog::app::commands::{AppCommand, CommandOutcome};
use sirenlog::app::events::AppEvent;
use sirenlog::config::CoreConfig;
use sirenlog::exchange::Readings;
use sirenlog::record::EventRecord;

use crate::mock_ports::{Fixture, WALL};

fn instant_fixture() -> Fixture {
    Fixture::with_config(CoreConfig {
        activation_threshold: 1,
        cooldown_window_ms: 0,
        ..CoreConfig::default()
    })
}

fn run(fx: &mut Fixture, cmd: AppCommand) -> Result<CommandOutcome, Error> {
    fx.app.handle_command(cmd, &WALL, &mut fx.sink)
}

#[test]
fn annotate_classifies_the_alarm() {
    let mut fx = instant_fixture();
    fx.feed("Alarm,U,92", 0);

    let out = run(
        &mut fx,
        AppCommand::Annotate {
            category: "A".into(),
        },
    )
    .unwrap();

    let expected = EventRecord::new("Alarm", "01-01-2024", "10:00:00", "A", "92%");
    assert_eq!(
        out,
        CommandOutcome::Annotated {
            index: 0,
            record: expected.clone()
        }
    );
    assert_eq!(fx.store.read_all().unwrap(), vec![expected.clone()]);
    assert_eq!(fx.app.cache().latest(), Some(&expected));
}

#[test]
fn annotate_walks_oldest_first() {
    let mut fx = instant_fixture();
    for (i, t) in ["One", "Two", "Three"].into_iter().zip([0, 10, 20]) {
        fx.feed(&format!("{i},U,50"), t);
    }
    run(&mut fx, AppCommand::Annotate { category: "A".into() }).unwrap();
    run(&mut fx, AppCommand::Annotate { category: "B".into() }).unwrap();

    let cats: Vec<_> = fx
        .store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|r| r.category)
        .collect();
    assert_eq!(cats, ["A", "B", "U"]);
}

#[test]
fn annotate_with_nothing_pending_is_noop() {
    let mut fx = instant_fixture();
    fx.feed("Alarm,P,92", 0);
    let before = fs::read(fx.store.path()).unwrap();

    let out = run(&mut fx, AppCommand::Annotate { category: "A".into() }).unwrap();
    assert_eq!(out, CommandOutcome::NothingToAnnotate);
    assert_eq!(fx.sink.last(), Some(&AppEvent::NothingToAnnotate));
    assert_eq!(fs::read(fx.store.path()).unwrap(), before);
}

#[test]
fn delete_last_removes_newest_and_refreshes_cache() {
    let mut fx = instant_fixture();
    fx.feed("First,U,10", 0);
    fx.feed("Second,U,20", 10);

    let out = run(&mut fx, AppCommand::DeleteLast).unwrap();
    assert!(matches!(out, CommandOutcome::Deleted(ref r) if r.title == "Second"));
    assert_eq!(fx.titles(), ["First"]);
    assert_eq!(fx.app.cache().len(), 1);
    assert_eq!(fx.app.cache().latest().unwrap().title, "First");

    run(&mut fx, AppCommand::DeleteLast).unwrap();
    assert!(matches!(
        run(&mut fx, AppCommand::DeleteLast),
        Err(Error::EmptyLog)
    ));
    assert!(fx.app.cache().is_empty());
}

#[test]
fn snapshot_never_overwrites() {
    let mut fx = instant_fixture();
    fx.feed("Alarm,U,92", 0);
    let log = fx.store.path().to_path_buf();

    let first = run(&mut fx, AppCommand::Snapshot { destination: log.clone() }).unwrap();
    let second = run(&mut fx, AppCommand::Snapshot { destination: log.clone() }).unwrap();

    assert_eq!(
        first,
        CommandOutcome::SnapshotWritten(fx.dir.path().join("data1.csv"))
    );
    assert_eq!(
        second,
        CommandOutcome::SnapshotWritten(fx.dir.path().join("data2.csv"))
    );
    assert_eq!(
        fs::read(fx.dir.path().join("data2.csv")).unwrap(),
        fs::read(&log).unwrap()
    );
}

#[test]
fn snapshot_into_missing_directory_fails_cleanly() {
    let mut fx = instant_fixture();
    let dest = fx.dir.path().join("no-such-dir").join("copy.csv");
    let err = run(&mut fx, AppCommand::Snapshot { destination: dest }).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(matches!(
        fx.sink.last(),
        Some(AppEvent::StoreFailed {
            operation: "snapshot",
            ..
        })
    ));
}

#[test]
fn manual_entry_bypasses_debounce() {
    let mut fx = Fixture::new();
    let entry = EventRecord::new("Bell", "", "", "U", "75%");
    run(&mut fx, AppCommand::AddManualEntry(entry)).unwrap();
    assert_eq!(fx.titles(), ["Bell"]);
    assert_eq!(fx.app.debouncer().count(), 0);
}

#[test]
fn export_lists_cache_newest_first() {
    let mut fx = instant_fixture();
    fx.feed("Old,U,1", 0);
    fx.feed("New,U,2", 10);

    let CommandOutcome::Readings(readings) = run(&mut fx, AppCommand::ExportReadings).unwrap()
    else {
        panic!("expected readings");
    };
    let json = readings.to_json().unwrap();
    assert!(json.starts_with(r#"{"readings":[{"title":"New""#));
    assert_eq!(Readings::from_json(&json).unwrap(), readings);
}
