//! Record source over any buffered byte stream.
//!
//! Wraps a serial port, a pipe or a replay file and hands out one chunk
//! per configured terminator.  Bytes that are not valid UTF-8 are replaced
//! rather than rejected; the codec decides whether the result is usable.

use std::io::{BufRead, ErrorKind};

use log::{debug, warn};

use crate::app::ports::RecordSource;

pub struct StreamSource<R> {
    reader: R,
    terminator: char,
    exhausted: bool,
}

impl<R: BufRead> StreamSource<R> {
    pub fn new(reader: R, terminator: char) -> Self {
        Self {
            reader,
            terminator,
            exhausted: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Read up to and including the terminator's encoding.
    fn read_raw(&mut self) -> std::io::Result<Vec<u8>> {
        let mut encoded = [0u8; 4];
        let term = self.terminator.encode_utf8(&mut encoded).as_bytes();
        let last = term[term.len() - 1];

        let mut raw = Vec::new();
        loop {
            match self.reader.read_until(last, &mut raw) {
                Ok(0) => return Ok(raw),
                Ok(_) if raw.ends_with(term) => {
                    raw.truncate(raw.len() - term.len());
                    return Ok(raw);
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead> RecordSource for StreamSource<R> {
    fn is_available(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.reader.fill_buf() {
            Ok(buf) => !buf.is_empty(),
            Err(e) if e.kind() == ErrorKind::WouldBlock => false,
            Err(e) => {
                warn!("Source: stream error, closing: {}", e);
                self.exhausted = true;
                false
            }
        }
    }

    fn read_chunk(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        match self.read_raw() {
            Ok(raw) if raw.is_empty() => {
                debug!("Source: end of stream");
                self.exhausted = true;
                None
            }
            Ok(raw) => Some(String::from_utf8_lossy(&raw).into_owned()),
            Err(e) => {
                warn!("Source: read failed, closing: {}", e);
                self.exhausted = true;
                None
            }
        }
    }
}
