//! Cache file writes.
//!
//! Bodies are written to a `.part` sibling, synced, then renamed over the
//! final name, so a cache entry is either absent or complete.

use crate::error::{LoraError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before the rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `w.safetensors` → `w.safetensors.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Creates all missing parent directories of `path`.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LoraError::fs(parent, e))?;
    }
    Ok(())
}

/// Writes `data` to `final_path` in one operation via a temp file and rename.
/// Overwrites an existing file at `final_path`.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> Result<()> {
    ensure_parent(final_path)?;
    let tmp = temp_path(final_path);

    let written = File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(data)?;
            f.sync_all()
        })
        .map_err(|e| LoraError::fs(&tmp, e));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, final_path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        LoraError::fs(final_path, e)
    })?;
    tracing::debug!(bytes = data.len(), "wrote {}", final_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("w.safetensors"));
        assert_eq!(p.to_string_lossy(), "w.safetensors.part");
        let p2 = temp_path(Path::new("/tmp/general/abc.safetensors"));
        assert_eq!(p2.to_string_lossy(), "/tmp/general/abc.safetensors.part");
    }

    #[test]
    fn write_atomic_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("general").join("nested").join("w.safetensors");
        write_atomic(&dest, b"payload").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
        assert!(!temp_path(&dest).exists());
    }

    #[test]
    fn write_atomic_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("w.safetensors");
        write_atomic(&dest, b"first").unwrap();
        write_atomic(&dest, b"second").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"second");
    }

    #[test]
    fn write_atomic_reports_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        // Parent is a regular file, so the directory cannot be created.
        let err = write_atomic(&blocker.join("w.safetensors"), b"data").unwrap_err();
        assert!(matches!(err, LoraError::Filesystem { .. }));
    }
}
