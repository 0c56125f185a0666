//! Offline fixture replay.
//!
//! Saved article pages live under `<fixtures_dir>/<source name>/*.html`
//! and are handed to the article strategy exactly as a live fetch would.

use crate::error::FetchError;
use crate::models::Page;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supplies saved pages for a source. Loads are synchronous and local.
pub trait FixtureProvider: Send + Sync {
    fn list_fixture_documents(&self, source_name: &str) -> Vec<Page>;
}

/// Reads `*.html` files from one directory per source, in file-name order.
#[derive(Debug, Clone)]
pub struct DirectoryFixtures {
    root: PathBuf,
}

impl DirectoryFixtures {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn html_files(dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
        let entries = std::fs::read_dir(dir).map_err(|source| FetchError::Fixture {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html" || ext == "htm"))
            .collect();
        files.sort();
        Ok(files)
    }
}

impl FixtureProvider for DirectoryFixtures {
    fn list_fixture_documents(&self, source_name: &str) -> Vec<Page> {
        let dir = self.root.join(source_name);
        let files = match Self::html_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(source = %source_name, error = %e, "No fixtures available");
                return Vec::new();
            }
        };

        let mut pages = Vec::with_capacity(files.len());
        for path in files {
            match std::fs::read_to_string(&path) {
                Ok(body) => {
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    pages.push(Page::new(format!("fixture://{source_name}/{file_name}"), body));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable fixture"),
            }
        }
        debug!(source = %source_name, count = pages.len(), "Loaded fixtures");
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_html_files_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("lemonde");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("b.html"), "<p>deux</p>").unwrap();
        std::fs::write(dir.join("a.html"), "<p>un</p>").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let pages = DirectoryFixtures::new(tmp.path()).list_fixture_documents("lemonde");

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].identifier, "fixture://lemonde/a.html");
        assert_eq!(pages[0].body, "<p>un</p>");
        assert_eq!(pages[1].identifier, "fixture://lemonde/b.html");
    }

    #[test]
    fn test_missing_source_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(DirectoryFixtures::new(tmp.path())
            .list_fixture_documents("absent")
            .is_empty());
    }
}
