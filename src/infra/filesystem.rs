//! Filesystem operations
//!
//! Handles file and directory operations.

use std::fs::{File, OpenOptions};
use std::path::Path;

use walkdir::WalkDir;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Remove a single file
pub fn remove_file(path: &Path) -> Result<(), FilesystemError> {
    std::fs::remove_file(path).map_err(|e| FilesystemError::RemoveFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write bytes to a file, creating parent directories
pub fn write_bytes(path: &Path, content: &[u8]) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| {
        let _ = std::fs::remove_file(path);
        FilesystemError::WriteFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
    })
}

/// Copy a single file, overwriting the destination
pub fn copy_file(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| FilesystemError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error: e.to_string(),
        })
}

/// Copy a file and fsync the copy
///
/// Mass-storage bootloaders act on a file as soon as it is complete, so the
/// data has to reach the device before returning.
pub fn copy_file_synced(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    let content = std::fs::read(from).map_err(|e| FilesystemError::ReadFile {
        path: from.to_path_buf(),
        error: e.to_string(),
    })?;
    std::fs::write(to, &content).map_err(|e| FilesystemError::WriteFile {
        path: to.to_path_buf(),
        error: e.to_string(),
    })?;
    flush(to)
}

/// Recursively copy a directory tree into `to` (created if missing)
pub fn copy_dir_recursive(from: &Path, to: &Path) -> Result<u64, FilesystemError> {
    let mut copied = 0;

    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| FilesystemError::ReadFile {
            path: e.path().unwrap_or(from).to_path_buf(),
            error: e.to_string(),
        })?;
        let rel = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| FilesystemError::ReadFile {
                path: entry.path().to_path_buf(),
                error: e.to_string(),
            })?;
        let target = to.join(rel);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Flush a file, or every file below a directory, to disk
pub fn flush(path: &Path) -> Result<(), FilesystemError> {
    if !path.is_dir() {
        return sync_file(path);
    }

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| FilesystemError::Flush {
            path: e.path().unwrap_or(path).to_path_buf(),
            error: e.to_string(),
        })?;
        if entry.file_type().is_file() {
            sync_file(entry.path())?;
        }
    }

    // Directories cannot be opened or fsynced on every platform
    if let Err(e) = File::open(path).and_then(|dir| dir.sync_all()) {
        tracing::debug!("Directory fsync unsupported for {}: {e}", path.display());
    }
    Ok(())
}

fn sync_file(path: &Path) -> Result<(), FilesystemError> {
    let flush_err = |e: std::io::Error| FilesystemError::Flush {
        path: path.to_path_buf(),
        error: e.to_string(),
    };
    // Windows only flushes handles opened for writing
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .or_else(|_| File::open(path))
        .map_err(flush_err)?;
    file.sync_all().map_err(flush_err)
}

/// Remove Python bytecode caches below `root`
///
/// Returns the number of entries removed.
pub fn clean_pycache(root: &Path) -> Result<usize, FilesystemError> {
    let mut removed = 0;

    if !root.is_dir() {
        return Ok(removed);
    }

    let stale: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            if entry.file_type().is_dir() {
                name == "__pycache__"
            } else {
                name.ends_with(".pyc") || name.ends_with(".pyo")
            }
        })
        .map(walkdir::DirEntry::into_path)
        .collect();

    for path in stale {
        // A cache directory may already be gone with its parent
        if !path.exists() {
            continue;
        }
        if path.is_dir() {
            remove_dir_all(&path)?;
        } else {
            remove_file(&path)?;
        }
        removed += 1;
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_dir_recursive_copies_nested_files() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("a/b")).unwrap();
        std::fs::write(src.join("top.py"), "top").unwrap();
        std::fs::write(src.join("a/b/deep.py"), "deep").unwrap();

        let dst = temp.path().join("dst");
        let copied = copy_dir_recursive(&src, &dst).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(std::fs::read_to_string(dst.join("top.py")).unwrap(), "top");
        assert_eq!(std::fs::read_to_string(dst.join("a/b/deep.py")).unwrap(), "deep");
    }

    #[test]
    fn test_write_bytes_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lib/nested/module.mpy");

        write_bytes(&path, b"\x4d\x05").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\x4d\x05");
    }

    #[test]
    fn test_copy_file_synced() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("firmware.uf2");
        let to = temp.path().join("NEW.uf2");
        std::fs::write(&from, b"UF2\n").unwrap();

        copy_file_synced(&from, &to).unwrap();

        assert_eq!(std::fs::read(&to).unwrap(), b"UF2\n");
    }

    #[test]
    fn test_copy_file_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = copy_file(&temp.path().join("nope"), &temp.path().join("out"));
        assert!(matches!(result, Err(FilesystemError::Copy { .. })));
    }

    #[test]
    fn test_clean_pycache() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("pkg/__pycache__")).unwrap();
        std::fs::write(root.join("pkg/__pycache__/mod.cpython-38.pyc"), "x").unwrap();
        std::fs::write(root.join("pkg/stale.pyc"), "x").unwrap();
        std::fs::write(root.join("pkg/mod.py"), "x").unwrap();

        let removed = clean_pycache(root).unwrap();

        assert!(removed >= 2);
        assert!(!root.join("pkg/__pycache__").exists());
        assert!(!root.join("pkg/stale.pyc").exists());
        assert!(root.join("pkg/mod.py").exists());
    }

    #[test]
    fn test_remove_dir_all_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        assert!(remove_dir_all(&temp.path().join("absent")).is_ok());
    }

    #[test]
    fn test_flush_directory_syncs_nested_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("lib/pkg")).unwrap();
        std::fs::write(temp.path().join("code.py"), "x").unwrap();
        std::fs::write(temp.path().join("lib/pkg/mod.py"), "x").unwrap();

        assert!(flush(temp.path()).is_ok());
        assert!(flush(&temp.path().join("code.py")).is_ok());
    }

    #[test]
    fn test_flush_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let result = flush(&temp.path().join("unplugged"));
        assert!(matches!(result, Err(FilesystemError::Flush { .. })));
    }
}
