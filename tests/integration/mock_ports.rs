//! Mock port adapters for integration tests.
//!
//! Every mock records or scripts its behaviour so tests can assert on the
//! full event history without a serial link or a real clock.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::Arc;

use sirenlog::app::events::AppEvent;
use sirenlog::app::ports::{EventSink, MonotonicClock, RecordSource, Timestamp, WallClock};
use sirenlog::app::service::EventLogService;
use sirenlog::config::CoreConfig;
use sirenlog::store::LogStore;
use tempfile::TempDir;

// ── ScriptedSource ────────────────────────────────────────────

/// Hands out pre-loaded chunks, one per `read_chunk`.
pub struct ScriptedSource {
    chunks: VecDeque<String>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl RecordSource for ScriptedSource {
    fn is_available(&mut self) -> bool {
        !self.chunks.is_empty()
    }

    fn read_chunk(&mut self) -> Option<String> {
        self.chunks.pop_front()
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Monotonic clock that only moves when told to.  Each `now_ms` call
/// also advances by `step_ms`, so a drained batch spreads over time.
pub struct ManualClock {
    now: Cell<u64>,
    step_ms: u64,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(start_ms: u64, step_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
            step_ms,
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step_ms);
        t
    }
}

// ── FixedWall ─────────────────────────────────────────────────

pub struct FixedWall(pub Option<(&'static str, &'static str)>);

impl WallClock for FixedWall {
    fn now(&self) -> Option<Timestamp> {
        self.0.map(|(date, time)| Timestamp {
            date: date.into(),
            time: time.into(),
        })
    }
}

pub const WALL: FixedWall = FixedWall(Some(("01-01-2024", "10:00:00")));

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepted(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::EventAccepted(_)))
            .count()
    }

    pub fn suppressed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CandidateSuppressed { .. }))
            .count()
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixture ───────────────────────────────────────────────────

/// A started service over a fresh log in a scratch directory.
pub struct Fixture {
    pub dir: TempDir,
    pub config: CoreConfig,
    pub store: Arc<LogStore>,
    pub app: EventLogService,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let config = CoreConfig {
            log_path: dir.path().join("data.csv"),
            ..config
        };
        let store = Arc::new(LogStore::open_with_config(&config).unwrap());
        let mut app = EventLogService::new(&config, Arc::clone(&store)).unwrap();
        let mut sink = RecordingSink::new();
        app.start(&mut sink).unwrap();
        Self {
            dir,
            config,
            store,
            app,
            sink,
        }
    }

    /// Restart the service over the same directory, as after a reboot.
    pub fn reboot(self) -> Self {
        let Self { dir, config, .. } = self;
        let store = Arc::new(LogStore::open_with_config(&config).unwrap());
        let mut app = EventLogService::new(&config, Arc::clone(&store)).unwrap();
        let mut sink = RecordingSink::new();
        app.start(&mut sink).unwrap();
        Self {
            dir,
            config,
            store,
            app,
            sink,
        }
    }

    /// Feed one chunk at `now_ms`.
    pub fn feed(&mut self, chunk: &str, now_ms: u64) {
        let _ = self.app.ingest(chunk, now_ms, &WALL, &mut self.sink);
    }

    pub fn titles(&self) -> Vec<String> {
        self.store
            .read_all()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect()
    }
}
