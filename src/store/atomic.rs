//! Write-temp/rename replacement of the log file.
//!
//! 1. Write the full new content to `<log>.tmp`
//! 2. Sync the temp file and check its length
//! 3. Rename the temp file over the log (atomic on POSIX and NTFS)
//! 4. Sync the parent directory
//!
//! A crash before step 3 leaves the original log untouched; the orphaned
//! temp file is removed by [`remove_stale_temp`] on the next open.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Error, IoOp, Result};

const TEMP_SUFFIX: &str = ".tmp";

/// `<dir>/data.csv` → `<dir>/data.csv.tmp`
pub(crate) fn temp_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(TEMP_SUFFIX);
    target.with_file_name(name)
}

/// A fully written and synced temp file waiting to replace its target.
#[must_use = "a staged file does nothing until committed"]
pub(crate) struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Steps 1–2.  On failure the temp file is removed and the target has
    /// not been touched.
    pub(crate) fn write(target: &Path, contents: &[u8]) -> Result<Self> {
        let temp = temp_path(target);
        if let Err(e) = write_synced(&temp, contents) {
            if let Err(rm) = fs::remove_file(&temp) {
                if rm.kind() != io::ErrorKind::NotFound {
                    warn!("Store: could not remove {}: {}", temp.display(), rm);
                }
            }
            return Err(e);
        }
        debug!("Store: staged {} bytes in {}", contents.len(), temp.display());
        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    /// Steps 3–4.
    pub(crate) fn commit(self) -> Result<()> {
        fs::rename(&self.temp, &self.target)
            .map_err(|e| Error::io(IoOp::Replace, &self.target, e))?;

        // The rename already happened; a directory sync failure only
        // weakens durability of the new name, so it is not an error.
        if let Err(e) = sync_parent(&self.target) {
            warn!("Store: directory sync after replace failed: {}", e);
        }
        Ok(())
    }

    pub(crate) fn temp(&self) -> &Path {
        &self.temp
    }
}

/// Remove a temp file left behind by an interrupted mutation.
/// Returns `true` when one was found.
pub(crate) fn remove_stale_temp(target: &Path) -> Result<bool> {
    let temp = temp_path(target);
    match fs::remove_file(&temp) {
        Ok(()) => {
            warn!(
                "Store: removed unfinished mutation residue {}",
                temp.display()
            );
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(IoOp::Cleanup, temp, e)),
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::io(IoOp::WriteTemp, path, e))?;
    file.write_all(contents)
        .map_err(|e| Error::io(IoOp::WriteTemp, path, e))?;
    file.sync_all().map_err(|e| Error::io(IoOp::Sync, path, e))?;

    let written = file
        .metadata()
        .map_err(|e| Error::io(IoOp::WriteTemp, path, e))?
        .len();
    if written != contents.len() as u64 {
        return Err(Error::io(
            IoOp::WriteTemp,
            path,
            io::Error::other(format!(
                "short write: {written} of {} bytes",
                contents.len()
            )),
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => fs::File::open(dir)?.sync_all(),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}
