//! Application service — the hexagonal core.
//!
//! [`EventLogService`] owns the debouncer, the ring cache and a shared
//! handle on the log store.  Raw chunks flow in through a
//! [`RecordSource`], operator actions arrive as [`AppCommand`]s, and every
//! outcome leaves through an [`EventSink`].
//!
//! ```text
//!  RecordSource ──▶ ┌──────────────────────────────────┐ ──▶ EventSink
//!                   │         EventLogService          │
//!  AppCommand  ───▶ │ codec · debounce · store · cache │
//!                   └──────────────────────────────────┘
//! ```
//!
//! The cache only changes after the store has accepted a mutation, so a
//! failed write never shows up on screen.

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::cache::RingCache;
use crate::codec::RecordCodec;
use crate::config::CoreConfig;
use crate::debounce::{Debouncer, Verdict};
use crate::error::{Error, Result};
use crate::exchange::Readings;
use crate::record::EventRecord;
use crate::store::{Annotation, LogStore};

use super::commands::{AppCommand, CommandOutcome};
use super::events::AppEvent;
use super::ports::{EventSink, MonotonicClock, RecordSource, WallClock};

// ───────────────────────────────────────────────────────────────
// EventLogService
// ───────────────────────────────────────────────────────────────

/// Orchestrates ingestion and operator commands against one log.
pub struct EventLogService {
    store: Arc<LogStore>,
    codec: RecordCodec,
    debouncer: Debouncer,
    cache: RingCache,
    chunks_seen: u64,
}

impl EventLogService {
    /// Construct the service from configuration.
    ///
    /// Does **not** load the cache; call [`start`](Self::start) next.
    pub fn new(config: &CoreConfig, store: Arc<LogStore>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            codec: store.codec(),
            store,
            debouncer: Debouncer::new(config.debounce()),
            cache: RingCache::new(config.ring_capacity),
            chunks_seen: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Fill the cache from the tail of the log.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.reload_cache()?;
        sink.emit(&AppEvent::Started {
            cached: self.cache.len(),
        });
        info!(
            "EventLogService started: {} cached record(s) from {}",
            self.cache.len(),
            self.store.path().display()
        );
        Ok(())
    }

    // ── Ingestion ─────────────────────────────────────────────

    /// Drain every chunk the source has ready.  Returns the number of
    /// events accepted and persisted.
    ///
    /// Store failures are reported through `sink` and do not stop the
    /// drain; the debouncer has already entered its cooldown for the lost
    /// event.
    pub fn poll(
        &mut self,
        source: &mut impl RecordSource,
        clock: &impl MonotonicClock,
        wall: &impl WallClock,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut accepted = 0;
        while source.is_available() {
            let Some(chunk) = source.read_chunk() else {
                break;
            };
            match self.ingest(&chunk, clock.now_ms(), wall, sink) {
                Ok(Some(_)) => accepted += 1,
                Ok(None) => {}
                Err(e) => error!("Ingest: accepted event lost: {}", e),
            }
        }
        accepted
    }

    /// Run one raw chunk through codec → debouncer → store + cache.
    ///
    /// Returns the persisted record when the chunk completed a burst.
    pub fn ingest(
        &mut self,
        chunk: &str,
        now_ms: u64,
        wall: &impl WallClock,
        sink: &mut impl EventSink,
    ) -> Result<Option<EventRecord>> {
        self.chunks_seen += 1;
        // A candidate the log cannot store must not move the debouncer.
        let decoded = self
            .codec
            .decode_candidate(chunk)
            .and_then(|c| self.codec.encode(&c).map(|_| c));
        let candidate = match decoded {
            Ok(c) => c,
            Err(e) => {
                warn!("Ingest: dropping chunk #{}: {}", self.chunks_seen, e);
                sink.emit(&AppEvent::CandidateRejected {
                    reason: e.to_string(),
                });
                return Ok(None);
            }
        };

        let mut record = match self.debouncer.offer(candidate, now_ms) {
            Verdict::Accepted(record) => record,
            Verdict::Counted { count } => {
                sink.emit(&AppEvent::CandidateCounted {
                    count,
                    threshold: self.debouncer.config().activation_threshold,
                });
                return Ok(None);
            }
            Verdict::Suppressed { remaining_ms } => {
                sink.emit(&AppEvent::CandidateSuppressed { remaining_ms });
                return Ok(None);
            }
            Verdict::Rejected => {
                sink.emit(&AppEvent::CandidateRejected {
                    reason: Error::InvalidRecord.to_string(),
                });
                return Ok(None);
            }
        };

        if let Some(ts) = wall.now() {
            record.stamp(ts.date, ts.time);
        } else {
            debug!("Ingest: wall clock not set, keeping incoming date/time");
        }

        if let Err(e) = self.store.append(&record) {
            report_failure("append", &e, sink);
            return Err(e);
        }
        self.cache.push(record.clone());
        sink.emit(&AppEvent::EventAccepted(record.clone()));
        Ok(Some(record))
    }

    // ── Command handling ──────────────────────────────────────

    /// Carry out an operator command.  Failures are also reported through
    /// `sink` as [`AppEvent::StoreFailed`].
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        wall: &impl WallClock,
        sink: &mut impl EventSink,
    ) -> Result<CommandOutcome> {
        match cmd {
            AppCommand::Annotate { category } => {
                let annotation = self
                    .store
                    .annotate_first_unclassified(&category)
                    .inspect_err(|e| report_failure("annotate", e, sink))?;
                match annotation {
                    Annotation::Annotated { index, record } => {
                        self.refresh_cache(sink);
                        sink.emit(&AppEvent::Annotated {
                            index,
                            record: record.clone(),
                        });
                        Ok(CommandOutcome::Annotated { index, record })
                    }
                    Annotation::NothingToAnnotate => {
                        sink.emit(&AppEvent::NothingToAnnotate);
                        Ok(CommandOutcome::NothingToAnnotate)
                    }
                }
            }
            AppCommand::DeleteLast => {
                let removed = self
                    .store
                    .delete_last()
                    .inspect_err(|e| report_failure("delete", e, sink))?;
                self.refresh_cache(sink);
                sink.emit(&AppEvent::Deleted(removed.clone()));
                Ok(CommandOutcome::Deleted(removed))
            }
            AppCommand::Snapshot { destination } => {
                let written = self
                    .store
                    .snapshot(&destination)
                    .inspect_err(|e| report_failure("snapshot", e, sink))?;
                sink.emit(&AppEvent::SnapshotWritten(written.clone()));
                Ok(CommandOutcome::SnapshotWritten(written))
            }
            AppCommand::AddManualEntry(mut record) => {
                if let Some(ts) = wall.now() {
                    if record.date.is_empty() {
                        record.date = ts.date;
                    }
                    if record.time.is_empty() {
                        record.time = ts.time;
                    }
                }
                self.store
                    .append(&record)
                    .inspect_err(|e| report_failure("manual entry", e, sink))?;
                self.cache.push(record.clone());
                sink.emit(&AppEvent::ManualEntryAdded(record.clone()));
                Ok(CommandOutcome::EntryAdded(record))
            }
            AppCommand::ExportReadings => Ok(CommandOutcome::Readings(Readings::from_cache(
                &self.cache,
            ))),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Most-recent-first view of accepted events.
    pub fn cache(&self) -> &RingCache {
        &self.cache
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Raw chunks seen since construction, including rejected ones.
    pub fn chunks_seen(&self) -> u64 {
        self.chunks_seen
    }

    // ── Internal ──────────────────────────────────────────────

    fn reload_cache(&mut self) -> Result<()> {
        let tail = self.store.read_window(self.cache.capacity())?;
        self.cache.rebuild_from(tail);
        Ok(())
    }

    /// The mutation already succeeded, so a failed re-read only leaves the
    /// cache stale until the next refresh.
    fn refresh_cache(&mut self, sink: &mut impl EventSink) {
        if let Err(e) = self.reload_cache() {
            report_failure("cache reload", &e, sink);
        }
    }
}

fn report_failure(operation: &'static str, e: &Error, sink: &mut impl EventSink) {
    match e {
        Error::EmptyLog => warn!("Store: {} skipped: {}", operation, e),
        _ => error!("Store: {} failed: {}", operation, e),
    }
    sink.emit(&AppEvent::StoreFailed {
        operation,
        error: e.to_string(),
        replace_failed: e.replace_failed(),
    });
}
