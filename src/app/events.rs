//! Outbound application events.
//!
//! The [`EventLogService`](super::service::EventLogService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log to serial, refresh
//! the screen, push to an event stream, etc.

use std::path::PathBuf;

use crate::record::EventRecord;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started; carries the number of cached records.
    Started { cached: usize },

    /// A chunk could not become a candidate, or the candidate was invalid.
    CandidateRejected { reason: String },

    /// A candidate was counted toward the current burst.
    CandidateCounted { count: u32, threshold: u32 },

    /// A candidate arrived during the cooldown and was dropped.
    CandidateSuppressed { remaining_ms: u64 },

    /// A confirmed event was persisted and cached.
    EventAccepted(EventRecord),

    /// An operator record was persisted and cached.
    ManualEntryAdded(EventRecord),

    /// The oldest unclassified record received a category.
    Annotated { index: usize, record: EventRecord },

    /// An annotate command found no unclassified record.
    NothingToAnnotate,

    /// The newest record was removed.
    Deleted(EventRecord),

    /// A full copy of the log was written.
    SnapshotWritten(PathBuf),

    /// A store operation failed.  `replace_failed` is set when the error
    /// hit the final replace step of a rewrite.
    StoreFailed {
        operation: &'static str,
        error: String,
        replace_failed: bool,
    },
}
