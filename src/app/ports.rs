//! Port traits — the hexagonal boundary between the log core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ EventLogService (domain)
//! ```
//!
//! Driving adapters (the sensor link, clocks) and driven adapters (event
//! sinks) implement these traits.  The
//! [`EventLogService`](super::service::EventLogService) consumes them via
//! generics, so the core never touches a serial port or a system clock
//! directly.

// ───────────────────────────────────────────────────────────────
// Record source (driving adapter: sensor link → domain)
// ───────────────────────────────────────────────────────────────

/// The byte stream carrying raw candidates, already split on the record
/// terminator.
pub trait RecordSource {
    /// Whether a complete chunk can be read without blocking.
    fn is_available(&mut self) -> bool;

    /// Next terminated chunk with the terminator removed.  `None` when the
    /// stream has nothing (more) to give.
    fn read_chunk(&mut self) -> Option<String>;
}

// ───────────────────────────────────────────────────────────────
// Clocks
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds used for debounce windows.  Must never go
/// backwards; the origin is arbitrary.
pub trait MonotonicClock {
    fn now_ms(&self) -> u64;
}

/// Calendar date and time of day as stored in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// `DD-MM-YYYY`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
}

/// Wall-clock source for stamping accepted events.
pub trait WallClock {
    /// `None` while the clock is not synchronised.
    fn now(&self) -> Option<Timestamp>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, screen,
/// event stream, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
