//! sirenlog — durable, debounced event log core.
//!
//! Raw sensor chunks are decoded by [`codec`], confirmed by
//! [`debounce`], persisted by [`store`] and mirrored in [`cache`].
//! [`app`] wires these together behind port traits; [`adapters`] holds
//! hosted implementations of those ports.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cache;
pub mod codec;
pub mod config;
pub mod debounce;
pub mod exchange;
pub mod record;
pub mod store;

mod error;

pub use error::{CodecError, Error, IoOp, Result};
