//! Crash-safe mutation of a single file.
//!
//! [`with_snapshot`] copies the target to a `.backup` sibling, runs the
//! mutation, and then either deletes the backup (commit) or moves it back
//! over the target (rollback). A target that did not exist beforehand is
//! removed again on rollback, so a failed mutation always leaves the file
//! exactly as it was.

use crate::error::SinkError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// `<file>.backup` next to `target`.
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}

#[derive(Debug)]
pub struct Snapshot {
    target: PathBuf,
    backup: PathBuf,
    existed: bool,
}

impl Snapshot {
    pub fn take(target: &Path) -> Result<Self, SinkError> {
        let backup = backup_path(target);
        let existed = target.exists();
        if existed {
            fs::copy(target, &backup).map_err(|e| SinkError::io(&backup, e))?;
            debug!(backup = %backup.display(), "Took snapshot");
        }
        Ok(Self {
            target: target.to_path_buf(),
            backup,
            existed,
        })
    }

    /// Drop the backup. The mutation stands even if the backup cannot be removed.
    pub fn commit(self) {
        if self.existed {
            if let Err(e) = fs::remove_file(&self.backup) {
                warn!(backup = %self.backup.display(), error = %e, "Failed to remove backup after commit");
            }
        }
    }

    /// Put the target back into its pre-mutation state.
    pub fn rollback(self) -> Result<(), SinkError> {
        if self.existed {
            fs::rename(&self.backup, &self.target).map_err(|e| SinkError::io(&self.target, e))?;
        } else if self.target.exists() {
            fs::remove_file(&self.target).map_err(|e| SinkError::io(&self.target, e))?;
        }
        Ok(())
    }
}

/// Run `mutate` on `target` inside a snapshot.
pub fn with_snapshot<T, F>(target: &Path, mutate: F) -> Result<T, SinkError>
where
    F: FnOnce(&Path) -> Result<T, SinkError>,
{
    let snapshot = Snapshot::take(target)?;
    match mutate(target) {
        Ok(value) => {
            snapshot.commit();
            Ok(value)
        }
        Err(e) => {
            if let Err(restore_err) = snapshot.rollback() {
                error!(target = %target.display(), error = %restore_err, "Failed to restore from backup");
            } else {
                warn!(target = %target.display(), error = %e, "Mutation failed; restored from backup");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fail(path: &Path) -> SinkError {
        SinkError::io(path, std::io::Error::other("disk full"))
    }

    #[test]
    fn test_commit_keeps_changes_and_removes_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("part.csv");
        fs::write(&target, "header\nrow1\n").unwrap();

        with_snapshot(&target, |p| {
            let mut f = fs::OpenOptions::new().append(true).open(p).unwrap();
            f.write_all(b"row2\n").unwrap();
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "header\nrow1\nrow2\n");
        assert!(!backup_path(&target).exists());
    }

    #[test]
    fn test_failed_mutation_restores_exact_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("part.csv");
        let before = b"word,context\nchat,\"Le chat dort\"\n".to_vec();
        fs::write(&target, &before).unwrap();

        let result: Result<(), _> = with_snapshot(&target, |p| {
            let mut f = fs::OpenOptions::new().append(true).open(p).unwrap();
            f.write_all(b"chien,half-writ").unwrap();
            Err(fail(p))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&target).unwrap(), before);
        assert!(!backup_path(&target).exists());
    }

    #[test]
    fn test_failed_mutation_of_new_file_removes_it() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("new.csv");

        let result: Result<(), _> = with_snapshot(&target, |p| {
            fs::write(p, "partial").unwrap();
            Err(fail(p))
        });

        assert!(result.is_err());
        assert!(!target.exists());
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/out/vocabulary_2025-05-06.csv")),
            PathBuf::from("/out/vocabulary_2025-05-06.csv.backup")
        );
    }
}
