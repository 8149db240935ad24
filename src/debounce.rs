//! Event debouncer with activation threshold and cooldown hysteresis.
//!
//! A single radio report can be a glitch.  The debouncer requires
//! `activation_threshold` corroborating candidates inside
//! `activation_window` before it accepts one, then enforces a
//! `cooldown_window` of silence so the same siren does not log twice.
//!
//! ```text
//!            valid candidate                count >= threshold
//!   ┌──────┐ ───────────────▶ ┌──────────────┐ ──────────────▶ ┌──────────┐
//!   │ Idle │                  │ Accumulating │                 │ Cooldown │
//!   └──────┘ ◀─── stale ───── └──────────────┘                 └──────────┘
//!       ▲                                                           │
//!       └──────── next candidate after cooldown_window ─────────────┘
//! ```
//!
//! There is no background timer.  Time only advances when a candidate
//! arrives, so every transition is evaluated inside [`Debouncer::offer`]
//! against the caller's monotonic `now_ms`.

use log::{debug, info, warn};

use crate::config::DebounceConfig;
use crate::record::EventRecord;

/// Externally visible debouncer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Accumulating,
    Cooldown,
}

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Threshold reached: persist this record.
    Accepted(EventRecord),
    /// Counted toward the current burst.
    Counted { count: u32 },
    /// Dropped inside the cooldown window.
    Suppressed { remaining_ms: u64 },
    /// Empty title or percentage; no effect on counts.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Accumulating { count: u32, burst_start_ms: u64 },
    Cooldown { since_ms: u64 },
}

pub struct Debouncer {
    cfg: DebounceConfig,
    phase: Phase,
    last_candidate_ms: Option<u64>,
    accepted_total: u64,
}

impl Debouncer {
    pub fn new(cfg: DebounceConfig) -> Self {
        Self {
            cfg,
            phase: Phase::Idle,
            last_candidate_ms: None,
            accepted_total: 0,
        }
    }

    /// Evaluate one candidate at monotonic time `now_ms`.
    pub fn offer(&mut self, candidate: EventRecord, now_ms: u64) -> Verdict {
        if !candidate.is_valid() {
            warn!("Debounce: dropping invalid candidate (blank title or percentage)");
            return Verdict::Rejected;
        }

        if let Phase::Cooldown { since_ms } = self.phase {
            let elapsed = now_ms.saturating_sub(since_ms);
            if elapsed < self.cfg.cooldown_window_ms {
                let remaining_ms = self.cfg.cooldown_window_ms - elapsed;
                debug!("Debounce: cooldown, {}ms remaining", remaining_ms);
                return Verdict::Suppressed { remaining_ms };
            }
            self.phase = Phase::Idle;
        }

        let stale = self
            .last_candidate_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.cfg.activation_window_ms);

        let (mut count, mut burst_start_ms) = match self.phase {
            Phase::Accumulating {
                count,
                burst_start_ms,
            } if !stale => (count, burst_start_ms),
            Phase::Accumulating { count, .. } => {
                info!("Debounce: burst of {} went stale, count reset", count);
                (0, now_ms)
            }
            _ => (0, now_ms),
        };

        count += 1;
        self.last_candidate_ms = Some(now_ms);

        if count >= self.cfg.activation_threshold {
            if now_ms.saturating_sub(burst_start_ms) <= self.cfg.activation_window_ms {
                info!(
                    "Debounce: event accepted after {} candidates ('{}')",
                    count, candidate.title
                );
                self.phase = Phase::Cooldown { since_ms: now_ms };
                self.accepted_total += 1;
                return Verdict::Accepted(candidate);
            }
            // Burst drifted wider than the window; start over from here.
            debug!("Debounce: burst spread exceeds window, restarting");
            count = 1;
            burst_start_ms = now_ms;
        }

        debug!("Debounce: count {}/{}", count, self.cfg.activation_threshold);
        self.phase = Phase::Accumulating {
            count,
            burst_start_ms,
        };
        Verdict::Counted { count }
    }

    pub fn state(&self) -> DebounceState {
        match self.phase {
            Phase::Idle => DebounceState::Idle,
            Phase::Accumulating { .. } => DebounceState::Accumulating,
            Phase::Cooldown { .. } => DebounceState::Cooldown,
        }
    }

    /// Candidates counted in the current burst.
    pub fn count(&self) -> u32 {
        match self.phase {
            Phase::Accumulating { count, .. } => count,
            _ => 0,
        }
    }

    /// Events accepted since construction.
    pub fn accepted_total(&self) -> u64 {
        self.accepted_total
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.cfg
    }

    /// Forget any burst or cooldown in progress.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.last_candidate_ms = None;
    }
}
