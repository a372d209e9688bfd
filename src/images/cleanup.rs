//! Media cleanup for deleted recipes and accounts
//!
//! Deletion never raises: failures are collected into the report and
//! logged. Files that are already gone are benign, which makes repeated
//! or out-of-order cleanup calls safe.

use std::io::ErrorKind;

use tracing::{debug, error, info, warn};

use super::MediaStore;

/// Outcome of one cleanup pass over a set of stored variants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// paths removed from storage
    pub deleted: Vec<String>,
    /// paths that were already gone
    pub absent: Vec<String>,
    /// paths that could not be removed
    pub failed: Vec<String>,
}

impl CleanupReport {
    /// True when nothing went wrong (absent files are fine).
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Removes the given stored variant paths from disk.
pub fn delete_variants(store: &MediaStore, variants: &[String]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for storage_path in variants {
        // Legacy rows may hold inline data URLs instead of file paths.
        if storage_path.is_empty() || storage_path.starts_with("data:") {
            continue;
        }
        let on_disk = store.absolute_path(storage_path);
        match std::fs::remove_file(&on_disk) {
            Ok(()) => report.deleted.push(storage_path.clone()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Cleanup found {storage_path} already absent");
                report.absent.push(storage_path.clone());
            }
            Err(err) => {
                warn!("Failed to delete {storage_path}: {err}");
                report.failed.push(storage_path.clone());
            }
        }
    }

    if !report.failed.is_empty() && report.deleted.is_empty() {
        error!(
            "Media cleanup failed entirely: {} file(s) left behind",
            report.failed.len()
        );
    } else if !report.failed.is_empty() {
        warn!(
            "Media cleanup partially failed: {} deleted, {} left behind",
            report.deleted.len(),
            report.failed.len()
        );
    } else if !report.deleted.is_empty() {
        info!("Media cleanup removed {} file(s)", report.deleted.len());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    fn store_with_files(paths: &[&str]) -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MediaStore::new(dir.path().to_path_buf());
        for path in paths {
            let on_disk = store.absolute_path(path);
            if let Some(parent) = on_disk.parent() {
                std::fs::create_dir_all(parent).expect("create dirs");
            }
            std::fs::write(&on_disk, b"jpeg bytes").expect("write file");
        }
        (dir, store)
    }

    #[test]
    fn deletes_both_variants() {
        let variants = vec![
            "/uploads/images/full/abc.jpg".to_string(),
            "/uploads/images/thumbnails/abc_thumb.jpg".to_string(),
        ];
        let (_dir, store) = store_with_files(&[
            "/uploads/images/full/abc.jpg",
            "/uploads/images/thumbnails/abc_thumb.jpg",
        ]);

        let report = delete_variants(&store, &variants);
        assert_eq!(report.deleted.len(), 2);
        assert!(report.all_ok());
        assert!(!store.absolute_path(&variants[0]).exists());
        assert!(!store.absolute_path(&variants[1]).exists());
    }

    #[test]
    fn second_pass_is_idempotent() {
        let variants = vec![
            "/uploads/images/full/abc.jpg".to_string(),
            "/uploads/images/thumbnails/abc_thumb.jpg".to_string(),
        ];
        let (_dir, store) = store_with_files(&[
            "/uploads/images/full/abc.jpg",
            "/uploads/images/thumbnails/abc_thumb.jpg",
        ]);

        let first = delete_variants(&store, &variants);
        assert_eq!(first.deleted.len(), 2);

        let second = delete_variants(&store, &variants);
        assert!(second.all_ok());
        assert!(second.deleted.is_empty());
        assert_eq!(second.absent.len(), 2);
    }

    #[test]
    fn inline_data_urls_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MediaStore::new(dir.path().to_path_buf());
        let report = delete_variants(
            &store,
            &["data:image/png;base64,AAAA".to_string(), String::new()],
        );
        assert_eq!(report, CleanupReport::default());
    }

    #[test]
    fn absolute_path_never_escapes_uploads() {
        let store = MediaStore::new(PathBuf::from("/srv/uploads"));
        let resolved = store.absolute_path("/uploads/images/full/abc.jpg");
        assert!(resolved.starts_with("/srv/uploads"));
    }
}
