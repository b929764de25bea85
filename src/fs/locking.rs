//! Advisory file locking for record reads and rewrites
//!
//! Several agents may read the store while one of them rewrites a record
//! header. `fs2` advisory locks keep a reader from observing a half-written
//! header. Locks are cooperative; they only help between shepherd processes.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{LifecycleError, LifecycleResult};

/// Read a record with a shared lock held.
pub fn locked_read(path: &Path) -> LifecycleResult<String> {
    let file = File::open(path).map_err(|e| LifecycleError::io(path, e))?;
    file.lock_shared().map_err(|e| LifecycleError::io(path, e))?;

    let mut content = String::new();
    BufReader::new(&file)
        .read_to_string(&mut content)
        .map_err(|e| LifecycleError::io(path, e))?;
    Ok(content)
}

/// Replace a record's content with an exclusive lock held.
///
/// The file is opened without truncation and only truncated once the lock is
/// acquired, so a concurrent `locked_read` never sees an empty record.
pub fn locked_write(path: &Path, content: &str) -> LifecycleResult<()> {
    #[allow(clippy::suspicious_open_options)]
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .map_err(|e| LifecycleError::io(path, e))?;
    file.lock_exclusive()
        .map_err(|e| LifecycleError::io(path, e))?;
    file.set_len(0).map_err(|e| LifecycleError::io(path, e))?;

    let mut writer = BufWriter::new(&file);
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| LifecycleError::io(path, e))?;
    Ok(())
}
