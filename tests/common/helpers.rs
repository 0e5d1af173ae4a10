use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use async_trait::async_trait;
use azdo_harvest::download::hash;
use azdo_harvest::{
    CodeSearch, CodeSearchPage, DownloaderBuilder, Error, FileResult, ItemRetrieval, ProjectRef,
    RepositoryCatalog, RepositoryRef, RepositoryResult, Result,
};
use reqwest::StatusCode;

// Common test constants
pub const TEST_ORG: &str = "myorg";
pub const TEST_PROJECT: &str = "myproject";
pub const TEST_PAT: &str = "test-pat";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Names of the entries of `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Asserts that a file exists with the given content
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
    assert_eq!(fs::read(path).expect("Failed to read file"), expected);
}

// === Model Helpers ===

/// Creates a file match in repository `repo` of the test project
pub fn file_result(repo: &str, path: &str) -> FileResult {
    file_result_at(repo, path, "c0ffee")
}

/// Creates a file match pinned to `commit`
pub fn file_result_at(repo: &str, path: &str, commit: &str) -> FileResult {
    FileResult::new(
        TEST_ORG,
        ProjectRef::new("proj-id", TEST_PROJECT),
        RepositoryRef::new(format!("{}-id", repo), repo),
        path,
        "main",
        Some(commit.to_string()),
    )
    .expect("Failed to create file result")
}

/// Creates `count` distinct file matches spread over one repository
pub fn file_results(repo: &str, count: usize) -> Vec<FileResult> {
    (0..count)
        .map(|i| file_result(repo, &format!("/src/file{}.txt", i)))
        .collect()
}

/// Creates a repository match in the test project
pub fn repository_result(name: &str) -> RepositoryResult {
    RepositoryResult::new(
        TEST_ORG,
        ProjectRef::new("proj-id", TEST_PROJECT),
        RepositoryRef::new(format!("{}-id", name), name),
        Some(format!("https://dev.azure.com/{}/{}/_git/{}", TEST_ORG, TEST_PROJECT, name)),
    )
}

/// Content the stub serves for `file` unless configured otherwise
pub fn default_content(file: &FileResult) -> Vec<u8> {
    format!("{}:{}", file.repository().name, file.filepath()).into_bytes()
}

/// Expected output name of `file` holding `content`
pub fn expected_name(file: &FileResult, content: &[u8]) -> String {
    hash::output_filename(&file.repository().name, file.filename(), &hash::digest(content))
}

// === Capability Stub ===

/// In-memory implementation of every capability.
///
/// Code search serves `pages` in order, using the page index as the
/// continuation token. Items are served from `contents` (keyed by path) or
/// [`default_content`].
#[derive(Default)]
pub struct StubApi {
    organization_scope: bool,
    repositories: Vec<RepositoryResult>,
    pages: Vec<Vec<FileResult>>,
    contents: HashMap<String, Vec<u8>>,
    failing_paths: HashSet<String>,
    panicking_paths: HashSet<String>,
    search_status: Option<StatusCode>,
    delay: Option<Duration>,
    pub search_calls: AtomicUsize,
    pub item_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            organization_scope: true,
            ..Default::default()
        }
    }

    pub fn organization_scope(mut self, supported: bool) -> Self {
        self.organization_scope = supported;
        self
    }

    pub fn repositories(mut self, names: &[&str]) -> Self {
        self.repositories = names.iter().map(|n| repository_result(n)).collect();
        self
    }

    pub fn page(mut self, files: Vec<FileResult>) -> Self {
        self.pages.push(files);
        self
    }

    pub fn content(mut self, path: &str, content: &[u8]) -> Self {
        self.contents.insert(path.to_string(), content.to_vec());
        self
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failing_paths.insert(path.to_string());
        self
    }

    /// Fetching `path` panics inside the fetcher.
    pub fn panicking(mut self, path: &str) -> Self {
        self.panicking_paths.insert(path.to_string());
        self
    }

    /// Every search call fails with `status` (401/403 as authentication errors).
    pub fn search_status(mut self, status: StatusCode) -> Self {
        self.search_status = Some(status);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn check_search(&self) -> Result<()> {
        match self.search_status {
            Some(status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)) => {
                Err(Error::Authentication {
                    status,
                    message: "stub rejected the token".into(),
                })
            }
            Some(status) => Err(Error::SearchTransport(format!("stub returned {}", status))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RepositoryCatalog for StubApi {
    fn organization(&self) -> &str {
        TEST_ORG
    }

    fn supports_organization_scope(&self) -> bool {
        self.organization_scope
    }

    async fn list_repositories(&self, _project: Option<&str>) -> Result<Vec<RepositoryResult>> {
        self.check_search()?;
        Ok(self.repositories.clone())
    }
}

#[async_trait]
impl CodeSearch for StubApi {
    fn organization(&self) -> &str {
        TEST_ORG
    }

    fn supports_organization_scope(&self) -> bool {
        self.organization_scope
    }

    async fn search_code(
        &self,
        _project: Option<&str>,
        _term: &str,
        continuation: Option<&str>,
    ) -> Result<CodeSearchPage> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_search()?;

        let index: usize = continuation.map_or(0, |c| c.parse().expect("stub continuation"));
        let matches = self.pages.get(index).cloned().unwrap_or_default();
        let continuation = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(CodeSearchPage {
            matches,
            continuation,
        })
    }
}

#[async_trait]
impl ItemRetrieval for StubApi {
    async fn get_item(&self, file: &FileResult) -> Result<Vec<u8>> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking_paths.contains(file.filepath()) {
            panic!("stub fetcher exploded on {}", file.filepath());
        }
        if self.failing_paths.contains(file.filepath()) {
            return Err(Error::Download(format!("{} returned 404 Not Found", file)));
        }
        Ok(self
            .contents
            .get(file.filepath())
            .cloned()
            .unwrap_or_else(|| default_content(file)))
    }
}

// === Downloader Builder Helpers ===

/// Creates a downloader builder without progress bars writing into `dir`
pub fn create_test_downloader_builder(api: Arc<StubApi>, dir: &Path) -> DownloaderBuilder {
    DownloaderBuilder::hidden(api).directory(dir.to_path_buf())
}
