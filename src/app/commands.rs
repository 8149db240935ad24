//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (touch buttons,
//! the HTTP API) that the
//! [`EventLogService`](super::service::EventLogService) carries out
//! against the log.

use std::path::PathBuf;

use crate::exchange::Readings;
use crate::record::EventRecord;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Give the oldest unclassified record this category.
    Annotate { category: String },

    /// Remove the newest record.
    DeleteLast,

    /// Copy the log to `destination` (or the first free numbered variant).
    Snapshot { destination: PathBuf },

    /// Append an operator-created record, bypassing the debouncer.
    AddManualEntry(EventRecord),

    /// Return the cached readings in the exchange format.
    ExportReadings,
}

/// Successful result of an [`AppCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Annotated { index: usize, record: EventRecord },
    NothingToAnnotate,
    Deleted(EventRecord),
    SnapshotWritten(PathBuf),
    EntryAdded(EventRecord),
    Readings(Readings),
}
