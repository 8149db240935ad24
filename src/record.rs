//! The event record — the unit of persisted data.

use serde::{Deserialize, Serialize};

/// Category sentinel for a record awaiting manual classification.
pub const UNCLASSIFIED: &str = "U";

/// One detected event as stored in the log.
///
/// All fields are text.  `date` is `DD-MM-YYYY`, `time` is `HH:MM:SS`,
/// `percentage` carries a trailing `%`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub percentage: String,
}

impl EventRecord {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        category: impl Into<String>,
        percentage: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            time: time.into(),
            category: category.into(),
            percentage: percentage.into(),
        }
    }

    /// A record is valid iff it has both a title and a percentage.
    /// Invalid records are never appended to the log.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.percentage.is_empty()
    }

    /// Whether the record still awaits annotation.
    pub fn is_unclassified(&self) -> bool {
        self.category == UNCLASSIFIED
    }

    /// Fill in the acceptance timestamp.
    pub fn stamp(&mut self, date: impl Into<String>, time: impl Into<String>) {
        self.date = date.into();
        self.time = time.into();
    }
}
