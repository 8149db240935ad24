//! Log store — the on-disk CSV event log.
//!
//! ```text
//!  Title,Date,Time,Category,Percentage⏎   ← header
//!  Siren,01-01-2024,10:00:00,A,92%⏎       ← oldest
//!  Siren,01-01-2024,10:05:12,U,88%⏎
//!  ...                                    ← newest last
//! ```
//!
//! `append` writes one terminated line at the end of the file.  Every
//! other mutation rewrites the whole file through [`atomic`]'s
//! write-temp/rename protocol, so the log on disk is always either the
//! old version or the new one.
//!
//! ## Concurrency
//!
//! The store serialises itself: mutations take the write half of an
//! internal [`RwLock`], reads and snapshots take the read half.  Share it
//! between the ingest path and the UI with an `Arc<LogStore>`.

mod atomic;
mod snapshot;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::codec::{HEADER, RecordCodec};
use crate::config::CoreConfig;
use crate::error::{CodecError, Error, IoOp, Result};
use crate::record::EventRecord;

/// Result of [`LogStore::annotate_first_unclassified`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// The oldest unclassified record now carries the new category.
    Annotated {
        /// Position of the record, oldest = 0.
        index: usize,
        record: EventRecord,
    },
    /// No record had category `"U"`; the file was not touched.
    NothingToAnnotate,
}

/// Handle on one CSV event log.
pub struct LogStore {
    path: PathBuf,
    codec: RecordCodec,
    lock: RwLock<()>,
}

impl LogStore {
    /// Open (or create) the log at `path`.
    ///
    /// Creates missing parent directories and a header-only file, removes
    /// the residue of an interrupted mutation, and cuts off a torn final
    /// line left by a crash during `append`.
    pub fn open(path: impl Into<PathBuf>, codec: RecordCodec) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Error::io(IoOp::Open, dir, e))?;
        }
        atomic::remove_stale_temp(&path)?;

        let store = Self {
            path,
            codec,
            lock: RwLock::new(()),
        };
        store.recover()?;
        info!("Store: opened {}", store.path.display());
        Ok(store)
    }

    /// Open the log named by `config`, validating it first.
    pub fn open_with_config(config: &CoreConfig) -> Result<Self> {
        config.validate()?;
        Self::open(&config.log_path, RecordCodec::new(config.terminator))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> RecordCodec {
        self.codec
    }

    // ── Mutations ─────────────────────────────────────────────

    /// Append `record` as the newest line.
    ///
    /// Either the whole line is on disk when this returns `Ok`, or the file
    /// is cut back to its previous length.
    pub fn append(&self, record: &EventRecord) -> Result<()> {
        if !record.is_valid() {
            return Err(Error::InvalidRecord);
        }
        let line = self.codec.encode_line(record)?;

        let _guard = self.lock.write();
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(IoOp::Open, &self.path, e))?;
        let before = file
            .metadata()
            .map_err(|e| Error::io(IoOp::Open, &self.path, e))?
            .len();

        let written = file
            .write_all(line.as_bytes())
            .map_err(|e| (IoOp::Append, e))
            .and_then(|()| file.sync_data().map_err(|e| (IoOp::Sync, e)));
        if let Err((op, e)) = written {
            if let Err(trunc) = file.set_len(before) {
                warn!("Store: could not roll back partial append: {}", trunc);
            }
            return Err(Error::io(op, &self.path, e));
        }

        info!("Store: appended '{}'", line.trim_end_matches(self.codec.terminator()));
        Ok(())
    }

    /// Give the oldest `"U"` record the category `category`.
    pub fn annotate_first_unclassified(&self, category: &str) -> Result<Annotation> {
        let category = category.trim();
        if category.is_empty() {
            return Err(CodecError::MalformedField { field: "category" }.into());
        }

        let _guard = self.lock.write();
        let image = self.load()?;
        let Some((index, row)) = image
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.record.is_unclassified())
        else {
            info!("Store: nothing to annotate");
            return Ok(Annotation::NothingToAnnotate);
        };

        let mut record = row.record.clone();
        record.category = category.to_owned();
        let line = self.codec.encode(&record)?;

        let content = &image.content;
        let mut updated = Vec::with_capacity(content.len() + line.len());
        updated.extend_from_slice(&content[..row.span.start]);
        updated.extend_from_slice(line.as_bytes());
        // Keep CRLF lines CRLF.
        if content[row.span.clone()].ends_with(b"\r") {
            updated.push(b'\r');
        }
        updated.extend_from_slice(&content[row.span.end..]);

        self.replace(&updated)?;
        info!("Store: record #{} annotated as '{}'", index, category);
        Ok(Annotation::Annotated { index, record })
    }

    /// Remove the newest record and return it.
    pub fn delete_last(&self) -> Result<EventRecord> {
        let _guard = self.lock.write();
        let image = self.load()?;
        let Some(row) = image.rows.last() else {
            warn!("Store: delete requested on an empty log");
            return Err(Error::EmptyLog);
        };

        let content = &image.content;
        let cut_end = (row.span.end + self.codec.terminator().len_utf8()).min(content.len());
        let mut updated = Vec::with_capacity(content.len());
        updated.extend_from_slice(&content[..row.span.start]);
        updated.extend_from_slice(&content[cut_end..]);

        self.replace(&updated)?;
        info!("Store: deleted newest record ({} remain)", image.rows.len() - 1);
        Ok(row.record.clone())
    }

    // ── Reads ─────────────────────────────────────────────────

    /// Up to the newest `n` valid records, **oldest first**.
    pub fn read_window(&self, n: usize) -> Result<Vec<EventRecord>> {
        let _guard = self.lock.read();
        let image = self.load()?;
        let skip = image.rows.len().saturating_sub(n);
        Ok(image.rows.into_iter().skip(skip).map(|r| r.record).collect())
    }

    /// Every valid record, oldest first.
    pub fn read_all(&self) -> Result<Vec<EventRecord>> {
        self.read_window(usize::MAX)
    }

    /// Number of valid records in the log.
    pub fn record_count(&self) -> Result<usize> {
        let _guard = self.lock.read();
        Ok(self.load()?.rows.len())
    }

    /// Copy the log byte-for-byte to `destination`, or to the first free
    /// numbered variant of it.  Passing the log's own path yields
    /// `data1.csv`, `data2.csv`, ...
    pub fn snapshot(&self, destination: &Path) -> Result<PathBuf> {
        let _guard = self.lock.read();
        snapshot::copy_to_free_name(&self.path, destination)
    }

    // ── Internal ──────────────────────────────────────────────

    fn replace(&self, contents: &[u8]) -> Result<()> {
        let staged = atomic::StagedFile::write(&self.path, contents)?;
        debug!("Store: replacing log from {}", staged.temp().display());
        staged.commit()
    }

    fn load(&self) -> Result<LogImage> {
        let content = fs::read(&self.path).map_err(|e| Error::io(IoOp::Read, &self.path, e))?;
        Ok(LogImage::parse(content, &self.codec))
    }

    /// Bring a freshly opened file back to a well-formed state.
    fn recover(&self) -> Result<()> {
        let _guard = self.lock.write();
        let content = match fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(Error::io(IoOp::Read, &self.path, e)),
        };

        if content.is_empty() {
            info!("Store: creating {}", self.path.display());
            return self.replace(self.codec.header_line().as_bytes());
        }

        let term = terminator_bytes(self.codec.terminator());
        let complete = terminated_lines(&content, &term)
            .last()
            .map_or(0, |span| span.end + term.len());
        if complete == content.len() {
            return Ok(());
        }
        warn!(
            "Store: dropping torn trailing line ({} bytes)",
            content.len() - complete
        );
        if complete == 0 {
            self.replace(self.codec.header_line().as_bytes())
        } else {
            self.replace(&content[..complete])
        }
    }
}

// ───────────────────────────────────────────────────────────────
// In-memory view of the file
// ───────────────────────────────────────────────────────────────

fn terminator_bytes(terminator: char) -> Vec<u8> {
    let mut buf = [0u8; 4];
    terminator.encode_utf8(&mut buf).as_bytes().to_vec()
}

/// Spans of every terminated line, terminator excluded.  Bytes after the
/// last terminator are not a complete line and get no span.
fn terminated_lines(content: &[u8], term: &[u8]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut at = 0;
    while at + term.len() <= content.len() {
        if content[at..].starts_with(term) {
            spans.push(start..at);
            at += term.len();
            start = at;
        } else {
            at += 1;
        }
    }
    spans
}

/// One decodable, valid record line.
struct Row {
    /// Byte range of the line, terminator excluded.
    span: Range<usize>,
    record: EventRecord,
}

/// The raw file bytes plus the position of every record in them.  Header,
/// blank, non-UTF-8 and undecodable lines are kept in `content` but have
/// no row.
struct LogImage {
    content: Vec<u8>,
    rows: Vec<Row>,
}

impl LogImage {
    fn parse(content: Vec<u8>, codec: &RecordCodec) -> Self {
        let term = terminator_bytes(codec.terminator());
        let mut rows = Vec::new();

        for (n, span) in terminated_lines(&content, &term).into_iter().enumerate() {
            let Ok(text) = std::str::from_utf8(&content[span.clone()]) else {
                warn!("Store: skipping non-UTF-8 line at byte {}", span.start);
                continue;
            };
            let is_header = n == 0 && text.trim() == HEADER;
            if is_header || text.trim().is_empty() {
                continue;
            }

            match codec.decode(text) {
                Ok(record) if record.is_valid() => rows.push(Row { span, record }),
                Ok(_) => debug!("Store: skipping invalid record at byte {}", span.start),
                Err(e) => warn!("Store: skipping unreadable line at byte {}: {}", span.start, e),
            }
        }

        Self { content, rows }
    }
}
