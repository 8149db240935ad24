//! Delimited record codec.
//!
//! Line format:
//! ```text
//! ┌───────┬──────┬──────┬──────────┬────────────┬────────────┐
//! │ title │ date │ time │ category │ percentage │ terminator │
//! └───────┴──────┴──────┴──────────┴────────────┴────────────┘
//!   fields joined by `,`; terminator is one configurable char
//! ```
//!
//! The codec is pure: it never touches the filesystem.  The terminator
//! is a single parameter so a newline-terminated log and a
//! sentinel-terminated log go through the same code.

use crate::error::CodecError;
use crate::record::EventRecord;

/// Separator between fields of one record.
pub const FIELD_SEPARATOR: char = ',';

/// Fields in a stored record.
pub const FIELD_COUNT: usize = 5;

/// Fields in a raw sensor payload (`title,category,percentage`).
pub const PAYLOAD_FIELD_COUNT: usize = 3;

/// Column names written as the first line of every log file.
pub const HEADER: &str = "Title,Date,Time,Category,Percentage";

const FIELD_NAMES: [&str; FIELD_COUNT] = ["title", "date", "time", "category", "percentage"];

/// Encoder/decoder bound to one record terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordCodec {
    terminator: char,
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new('\n')
    }
}

impl RecordCodec {
    pub fn new(terminator: char) -> Self {
        Self { terminator }
    }

    pub fn terminator(&self) -> char {
        self.terminator
    }

    /// Join the five fields in fixed order.  A field holding the
    /// separator, the terminator or edge padding that [`decode`](Self::decode)
    /// would trim is rejected.  The terminator is not
    /// appended; see [`encode_line`](Self::encode_line).
    pub fn encode(&self, record: &EventRecord) -> Result<String, CodecError> {
        let fields = fields_of(record);
        for (name, value) in FIELD_NAMES.into_iter().zip(fields) {
            if value.contains(FIELD_SEPARATOR)
                || value.contains(self.terminator)
                || value.starts_with(is_padding)
                || value.ends_with(is_padding)
            {
                return Err(CodecError::MalformedField { field: name });
            }
        }
        let mut line = String::with_capacity(fields.iter().map(|f| f.len() + 1).sum());
        for (i, value) in fields.iter().enumerate() {
            if i > 0 {
                line.push(FIELD_SEPARATOR);
            }
            line.push_str(value);
        }
        Ok(line)
    }

    /// Encode and append the terminator, ready to be written to the log.
    pub fn encode_line(&self, record: &EventRecord) -> Result<String, CodecError> {
        let mut line = self.encode(record)?;
        line.push(self.terminator);
        Ok(line)
    }

    /// The header line including its terminator.
    pub fn header_line(&self) -> String {
        let mut line = String::from(HEADER);
        line.push(self.terminator);
        line
    }

    /// Decode one stored line (terminator already stripped).
    ///
    /// Anything past the fourth separator belongs to `percentage`.
    pub fn decode(&self, line: &str) -> Result<EventRecord, CodecError> {
        let parts: Vec<&str> = line.splitn(FIELD_COUNT, FIELD_SEPARATOR).collect();
        if parts.len() < FIELD_COUNT {
            return Err(CodecError::ShortRecord {
                found: parts.len(),
                expected: FIELD_COUNT,
            });
        }
        Ok(EventRecord {
            title: clean(parts[0]),
            date: clean(parts[1]),
            time: clean(parts[2]),
            category: clean(parts[3]),
            percentage: clean(parts[4]),
        })
    }

    /// Decode a raw chunk from the sensor link into a candidate record.
    ///
    /// Accepts either a full stored row or the bridge's short
    /// `title,category,percentage` payload, whose date and time are left
    /// empty until acceptance.  A bare number in `percentage` gets its
    /// `%` sign.
    pub fn decode_candidate(&self, chunk: &str) -> Result<EventRecord, CodecError> {
        let found = chunk.matches(FIELD_SEPARATOR).count() + 1;
        let mut record = if found >= FIELD_COUNT {
            self.decode(chunk)?
        } else if found >= PAYLOAD_FIELD_COUNT {
            let parts: Vec<&str> = chunk.splitn(PAYLOAD_FIELD_COUNT, FIELD_SEPARATOR).collect();
            EventRecord {
                title: clean(parts[0]),
                category: clean(parts[1]),
                percentage: clean(parts[2]),
                ..EventRecord::default()
            }
        } else {
            return Err(CodecError::ShortRecord {
                found,
                expected: PAYLOAD_FIELD_COUNT,
            });
        };

        if !record.percentage.is_empty() && !record.percentage.ends_with('%') {
            record.percentage.push('%');
        }
        Ok(record)
    }
}

fn fields_of(record: &EventRecord) -> [&str; FIELD_COUNT] {
    [
        &record.title,
        &record.date,
        &record.time,
        &record.category,
        &record.percentage,
    ]
}

/// Whitespace and stray control bytes picked up on the serial link.
fn is_padding(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

fn clean(field: &str) -> String {
    field.trim_matches(is_padding).to_owned()
}
