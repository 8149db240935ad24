//! Full-copy snapshots of the log.
//!
//! A snapshot never overwrites an existing file: when the requested name
//! is taken a counter is inserted before the extension, the way the
//! device names its SD-card copies (`data.csv` → `data1.csv`,
//! `data2.csv`, ...).

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, IoOp, Result};

/// `data.csv` with counter 2 → `data2.csv`.
pub(crate) fn numbered(destination: &Path, counter: u32) -> PathBuf {
    let stem = destination.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(counter.to_string());
    if let Some(ext) = destination.extension() {
        name.push(".");
        name.push(ext);
    }
    destination.with_file_name(name)
}

/// Create the first free name among `destination`, `numbered(1)`, ...
/// Creation uses `create_new`, so two snapshots can never collide.
fn create_free(destination: &Path) -> Result<(File, PathBuf)> {
    let candidates = std::iter::once(destination.to_path_buf())
        .chain((1..=u32::MAX).map(|n| numbered(destination, n)));
    for candidate in candidates {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(Error::io(IoOp::Copy, candidate, e)),
        }
    }
    Err(Error::io(
        IoOp::Copy,
        destination,
        io::Error::other("no free snapshot name"),
    ))
}

/// Copy `source` byte-for-byte to a free name derived from `destination`.
pub(crate) fn copy_to_free_name(source: &Path, destination: &Path) -> Result<PathBuf> {
    let src = File::open(source).map_err(|e| Error::io(IoOp::Open, source, e))?;
    let (dst, path) = create_free(destination)?;

    let copied = copy_synced(src, dst);
    match copied {
        Ok(bytes) => {
            info!(
                "Store: snapshot {} -> {} ({} bytes)",
                source.display(),
                path.display(),
                bytes
            );
            Ok(path)
        }
        Err(e) => {
            if let Err(rm) = fs::remove_file(&path) {
                warn!("Store: could not remove partial snapshot {}: {}", path.display(), rm);
            }
            Err(Error::io(IoOp::Copy, path, e))
        }
    }
}

fn copy_synced(src: File, dst: File) -> io::Result<u64> {
    let mut reader = BufReader::new(src);
    let mut writer = BufWriter::new(dst);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(bytes)
}
