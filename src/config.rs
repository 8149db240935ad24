//! Core configuration parameters
//!
//! Everything the event log core needs is passed in through
//! [`CoreConfig`]; nothing is read from ambient process state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codec::FIELD_SEPARATOR;
use crate::error::{Error, Result};

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    // --- Log store ---
    /// Path of the CSV log file.
    pub log_path: PathBuf,
    /// Character terminating each record line.
    pub terminator: char,

    // --- Ring cache ---
    /// Number of most-recent events kept in memory.
    pub ring_capacity: usize,

    // --- Debounce ---
    /// Corroborating candidates required before an event is accepted.
    pub activation_threshold: u32,
    /// Maximum spread (milliseconds) of a corroborating burst.
    pub activation_window_ms: u64,
    /// Quiet period (milliseconds) after an accepted event.
    pub cooldown_window_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("/sd/data.csv"),
            terminator: '\n',

            ring_capacity: 10,

            activation_threshold: 2,
            activation_window_ms: 5_000,
            cooldown_window_ms: 10_000,
        }
    }
}

impl CoreConfig {
    /// Reject values that would break the log format or the debouncer.
    pub fn validate(&self) -> Result<()> {
        if self.log_path.as_os_str().is_empty() {
            return Err(Error::Config("log_path must not be empty"));
        }
        if self.terminator == FIELD_SEPARATOR {
            return Err(Error::Config("terminator must differ from the field separator"));
        }
        if self.terminator == '%' {
            return Err(Error::Config("terminator `%` collides with percentage values"));
        }
        if self.terminator.is_whitespace() && self.terminator != '\n' {
            return Err(Error::Config(
                "terminator must be `\\n` or a non-whitespace sentinel",
            ));
        }
        if self.ring_capacity == 0 {
            return Err(Error::Config("ring_capacity must be at least 1"));
        }
        if self.activation_threshold == 0 {
            return Err(Error::Config("activation_threshold must be at least 1"));
        }
        if self.activation_window_ms == 0 {
            return Err(Error::Config("activation_window_ms must be non-zero"));
        }
        Ok(())
    }

    /// Debounce parameters for [`Debouncer`](crate::debounce::Debouncer).
    pub fn debounce(&self) -> DebounceConfig {
        DebounceConfig {
            activation_threshold: self.activation_threshold,
            activation_window_ms: self.activation_window_ms,
            cooldown_window_ms: self.cooldown_window_ms,
        }
    }
}

/// Timing parameters of the debounce state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    pub activation_threshold: u32,
    pub activation_window_ms: u64,
    pub cooldown_window_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        CoreConfig::default().debounce()
    }
}
