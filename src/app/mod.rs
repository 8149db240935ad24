//! Application core — ingest orchestration and operator commands.
//!
//! The domain pieces (codec, debouncer, store, cache) are wired together
//! by [`service::EventLogService`].  Everything outside the process
//! (byte source, clocks, event output) is reached through the **port
//! traits** in [`ports`], so the service runs unchanged against mocks.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
