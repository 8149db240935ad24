//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! line through the `log` facade.  A screen or event-stream adapter
//! would implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { cached } => {
                info!("START | cached={}", cached);
            }
            AppEvent::CandidateRejected { reason } => {
                warn!("REJECT | {}", reason);
            }
            AppEvent::CandidateCounted { count, threshold } => {
                debug!("COUNT | {}/{}", count, threshold);
            }
            AppEvent::CandidateSuppressed { remaining_ms } => {
                debug!("COOLDOWN | {}ms left", remaining_ms);
            }
            AppEvent::EventAccepted(r) => {
                info!(
                    "ACCEPT | {} | {} {} | cat={} | {}",
                    r.title, r.date, r.time, r.category, r.percentage
                );
            }
            AppEvent::ManualEntryAdded(r) => {
                info!(
                    "MANUAL | {} | {} {} | cat={} | {}",
                    r.title, r.date, r.time, r.category, r.percentage
                );
            }
            AppEvent::Annotated { index, record } => {
                info!("STORE | annotated #{} '{}' as {}", index, record.title, record.category);
            }
            AppEvent::NothingToAnnotate => {
                info!("STORE | nothing to annotate");
            }
            AppEvent::Deleted(r) => {
                info!("STORE | deleted '{}' {} {}", r.title, r.date, r.time);
            }
            AppEvent::SnapshotWritten(path) => {
                info!("STORE | snapshot {}", path.display());
            }
            AppEvent::StoreFailed {
                operation,
                error,
                replace_failed,
            } => {
                warn!(
                    "STORE | {} failed{} | {}",
                    operation,
                    if *replace_failed { " at replace" } else { "" },
                    error
                );
            }
        }
    }
}
