//! The combined output of a search.

use super::file::{FileKey, FileResult};
use super::repository::RepositoryResult;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Repository-name matches and file-content matches of one search.
///
/// Both sequences keep the order the platform returned them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSet {
    /// Repositories whose name matched.
    pub repositories: Vec<RepositoryResult>,
    /// Files whose content matched.
    pub files: Vec<FileResult>,
}

impl SearchResultSet {
    /// Whether neither stream produced a match.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.files.is_empty()
    }
}

/// Collects distinct files in arrival order up to a cap.
#[derive(Debug)]
pub(crate) struct FileCollector {
    seen: HashSet<FileKey>,
    files: Vec<FileResult>,
    cap: usize,
}

impl FileCollector {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            seen: HashSet::new(),
            files: Vec::new(),
            cap,
        }
    }

    /// Add `file` unless it was already seen or the cap is reached.
    ///
    /// Returns `true` when the file was kept.
    pub(crate) fn push(&mut self, file: FileResult) -> bool {
        if self.is_full() || !self.seen.insert(file.key()) {
            return false;
        }
        self.files.push(file);
        true
    }

    pub(crate) fn is_full(&self) -> bool {
        self.files.len() >= self.cap
    }

    pub(crate) fn len(&self) -> usize {
        self.files.len()
    }

    pub(crate) fn into_files(self) -> Vec<FileResult> {
        self.files
    }
}
