//! JSON exchange format for the cached readings.
//!
//! ```json
//! {"readings":[{"title":"Siren","date":"01-01-2024","time":"10:00:00",
//!               "category":"U","percentage":"92%"}, ...]}
//! ```
//!
//! Readings are listed newest first, the order the cache holds them.

use serde::{Deserialize, Serialize};

use crate::cache::RingCache;
use crate::record::EventRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readings {
    pub readings: Vec<EventRecord>,
}

impl Readings {
    pub fn from_cache(cache: &RingCache) -> Self {
        Self {
            readings: cache.to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
