//! Disk mirroring for downloaded response bodies.
//!
//! Unlike a read-through cache, this mirror is write-only from the
//! downloader's point of view: it exists so an operator can inspect what
//! was fetched, not so the pipeline can skip a network round-trip. Failures
//! here are logged and never abort a download (`SPEC_FULL.md` §4.1, §7
//! `DiskMirrorFailure`).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

/// Validates that `dir` exists and is a directory, opening it to make sure
/// it is actually reachable (a dangling symlink or permission problem
/// surfaces here rather than on the first write).
pub fn validate_cache_dir(dir: &Path) -> std::io::Result<()> {
    let meta = fs::metadata(dir)?;
    if !meta.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            format!("{} is not a directory", dir.display()),
        ));
    }
    // Open-dir test: confirms the directory is actually listable, not just
    // present in `metadata`.
    fs::read_dir(dir)?;
    Ok(())
}

/// Writes `bytes` to `<cache_dir>/<sequence>_img.jpg`.
///
/// The `.jpg` suffix is literal and does not reflect the actual content
/// type — a documented quirk carried over from the original design
/// (`SPEC_FULL.md` §9(b)). Failures are logged by the caller, not returned,
/// so a slow or failing disk never prevents the in-memory image from being
/// handed back.
pub fn mirror_path(cache_dir: &Path, sequence: u64) -> PathBuf {
    cache_dir.join(format!("{sequence}_img.jpg"))
}

pub fn write_mirror(cache_dir: &Path, sequence: u64, bytes: &[u8]) {
    let path = mirror_path(cache_dir, sequence);
    match fs::write(&path, bytes) {
        Ok(()) => trace!(path = %path.display(), size = bytes.len(), "mirrored response body"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to mirror response body"),
    }
}

/// Removes every non-directory entry directly inside `dir`.
///
/// Idempotent and best-effort: a per-file removal error is logged, not
/// fatal, and a sub-directory is reported and skipped rather than removed
/// (the mirror never creates sub-directories itself, so one present here is
/// foreign state the cleanup declines to touch).
pub fn clear_cache_dir(dir: &Path) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "failed to read cache directory for cleanup");
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read cache directory entry");
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        if is_dir {
            warn!(path = %path.display(), "skipping sub-directory found inside cache directory");
            continue;
        }

        if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "failed to remove cache entry");
        } else {
            trace!(path = %path.display(), "removed cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn validate_rejects_missing_dir() {
        let missing = PathBuf::from("/nonexistent/definitely/not/here");
        assert!(validate_cache_dir(&missing).is_err());
    }

    #[test]
    fn validate_accepts_real_dir() {
        let dir = tempdir().unwrap();
        assert!(validate_cache_dir(dir.path()).is_ok());
    }

    #[test]
    fn mirror_path_is_sequential_and_literal_jpg() {
        let dir = PathBuf::from("/cache");
        assert_eq!(mirror_path(&dir, 0), PathBuf::from("/cache/0_img.jpg"));
        assert_eq!(mirror_path(&dir, 7), PathBuf::from("/cache/7_img.jpg"));
    }

    #[test]
    fn write_mirror_creates_file() {
        let dir = tempdir().unwrap();
        write_mirror(dir.path(), 0, b"hello");
        let contents = fs::read(mirror_path(dir.path(), 0)).unwrap();
        assert_eq!(contents, b"hello");
    }

    #[test]
    fn clear_cache_dir_removes_files_but_skips_subdirs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();

        clear_cache_dir(dir.path());

        assert!(!dir.path().join("a.jpg").exists());
        assert!(dir.path().join("b").exists());
    }
}
