//! Matched files and how to retrieve them.
//!
//! A [`FileResult`] carries everything needed to fetch the file again through
//! the Git Items API, so stored results can be replayed without searching.
//!
//! ```rust
//! use azdo_harvest::{FileResult, ProjectRef, RepositoryRef};
//!
//! # fn main() -> Result<(), azdo_harvest::Error> {
//! let file = FileResult::new(
//!     "my-org",
//!     ProjectRef::new("proj-id", "my-project"),
//!     RepositoryRef::new("repo-id", "my-repo"),
//!     "/src/app.py",
//!     "develop",
//!     Some("c0ffee".to_string()),
//! )?;
//! assert_eq!(file.filename(), "app.py");
//! println!("{}", file.download_url()?);
//! # Ok(())
//! # }
//! ```

use super::repository::{ProjectRef, RepositoryRef};
use crate::error::{Error, Result};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default host of the Azure DevOps REST API.
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// REST API version used for item retrieval.
pub const API_VERSION: &str = "7.1";

/// A file whose content matched a search term.
///
/// Deserialization goes through [`FileResult::new`], so stored results are
/// validated the same way as fresh ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFileResult")]
pub struct FileResult {
    organization: String,
    project: ProjectRef,
    repository: RepositoryRef,
    filepath: String,
    branch: String,
    commit_id: Option<String>,
}

/// Unvalidated shape of a serialized [`FileResult`].
#[derive(Deserialize)]
struct RawFileResult {
    organization: String,
    project: ProjectRef,
    repository: RepositoryRef,
    filepath: String,
    branch: String,
    commit_id: Option<String>,
}

impl TryFrom<RawFileResult> for FileResult {
    type Error = Error;

    fn try_from(raw: RawFileResult) -> Result<Self> {
        FileResult::new(
            raw.organization,
            raw.project,
            raw.repository,
            raw.filepath,
            raw.branch,
            raw.commit_id,
        )
    }
}

/// Identity of a file match: repository id, path and commit.
pub(crate) type FileKey = (String, String, Option<String>);

impl FileResult {
    /// Creates a new [`FileResult`].
    ///
    /// Fails when the path has no final segment to use as a file name, or
    /// when the repository name or file name could not be used as part of a
    /// single output file name (path separators, `..`).
    pub fn new(
        organization: impl Into<String>,
        project: ProjectRef,
        repository: RepositoryRef,
        filepath: impl Into<String>,
        branch: impl Into<String>,
        commit_id: Option<String>,
    ) -> Result<Self> {
        let filepath = filepath.into();
        if last_segment(&filepath).is_empty() {
            return Err(Error::InvalidInput(format!(
                "the path \"{}\" does not contain a file name",
                filepath
            )));
        }
        if !is_plain_name(&repository.name) {
            return Err(Error::InvalidInput(format!(
                "the repository name \"{}\" is not a plain name",
                repository.name
            )));
        }
        if last_segment(&filepath).contains('\\') {
            return Err(Error::InvalidInput(format!(
                "the path \"{}\" ends in a segment containing a backslash",
                filepath
            )));
        }

        Ok(Self {
            organization: organization.into(),
            project,
            repository,
            filepath,
            branch: branch.into(),
            commit_id: commit_id.filter(|c| !c.is_empty()),
        })
    }

    /// Organization the file lives in.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Owning project.
    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    /// Owning repository.
    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    /// Full path of the file inside the repository.
    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    /// Branch the match was found on.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Commit the match was indexed at, if known.
    pub fn commit_id(&self) -> Option<&str> {
        self.commit_id.as_deref()
    }

    /// Last segment of [`FileResult::filepath`].
    pub fn filename(&self) -> &str {
        last_segment(&self.filepath)
    }

    pub(crate) fn key(&self) -> FileKey {
        (
            self.repository.id.clone(),
            self.filepath.clone(),
            self.commit_id.clone(),
        )
    }

    /// Query parameters for the Git Items API.
    ///
    /// The version descriptor pins the commit when one is known and falls back
    /// to the branch otherwise.
    pub fn download_params(&self) -> Vec<(&'static str, String)> {
        let (version, version_type) = match &self.commit_id {
            Some(commit) => (commit.clone(), "commit"),
            None => (self.branch.clone(), "branch"),
        };
        vec![
            ("path", self.filepath.clone()),
            ("versionDescriptor.version", version),
            ("versionDescriptor.versionType", version_type.to_string()),
            ("includeContent", "true".to_string()),
            ("api-version", API_VERSION.to_string()),
        ]
    }

    /// URL of this file on the public Azure DevOps host.
    pub fn download_url(&self) -> Result<Url> {
        let base = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| Error::Internal(format!("invalid default base url: {}", e)))?;
        self.download_url_with_base(&base)
    }

    /// URL of this file relative to `base`.
    pub fn download_url_with_base(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidInput(format!("the url \"{}\" cannot be a base", base)))?
            .pop_if_empty()
            .extend([
                self.organization.as_str(),
                self.project.name.as_str(),
                "_apis",
                "git",
                "repositories",
                self.repository.identifier(),
                "items",
            ]);
        url.query_pairs_mut().extend_pairs(self.download_params());
        Ok(url)
    }
}

impl fmt::Display for FileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} (branch: {})",
            self.repository.name, self.filepath, self.branch
        )
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Non-empty, without path separators or `..`.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn file(filepath: &str, commit: Option<&str>) -> FileResult {
        FileResult::new(
            "my-org",
            ProjectRef::new("proj-id-456", "my-project"),
            RepositoryRef::new("repo-id-123", "my-repo"),
            filepath,
            "develop",
            commit.map(String::from),
        )
        .unwrap()
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_filename_is_last_segment() {
        assert_eq!(file("/src/app.py", None).filename(), "app.py");
        assert_eq!(file("Dockerfile", None).filename(), "Dockerfile");
        assert_eq!(file("/a/b/c/.gitignore", None).filename(), ".gitignore");
    }

    #[test]
    fn test_rejects_path_without_filename() {
        let result = FileResult::new(
            "org",
            ProjectRef::new("p", "p"),
            RepositoryRef::new("r", "r"),
            "/src/",
            "main",
            None,
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_repository_names_that_leave_the_directory() {
        for name in ["../escape", "a/b", "a\\b", "..", ""] {
            let result = FileResult::new(
                "org",
                ProjectRef::new("p", "p"),
                RepositoryRef::new("r", name),
                "/a.txt",
                "main",
                None,
            );
            assert!(matches!(result, Err(Error::InvalidInput(_))), "{:?}", name);
        }
    }

    #[test]
    fn test_rejects_backslash_in_filename() {
        let result = FileResult::new(
            "org",
            ProjectRef::new("p", "p"),
            RepositoryRef::new("r", "repo"),
            "/src/..\\..\\evil.txt",
            "main",
            None,
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_download_url_pins_commit() {
        let url = file("/src/app.py", Some("commit-789")).download_url().unwrap();

        assert_eq!(
            url.path(),
            "/my-org/my-project/_apis/git/repositories/repo-id-123/items"
        );
        let q = query(&url);
        assert_eq!(q["path"], "/src/app.py");
        assert_eq!(q["versionDescriptor.version"], "commit-789");
        assert_eq!(q["versionDescriptor.versionType"], "commit");
        assert_eq!(q["includeContent"], "true");
        assert_eq!(q["api-version"], "7.1");
    }

    #[test]
    fn test_download_url_falls_back_to_branch() {
        let url = file("/src/app.py", None).download_url().unwrap();
        let q = query(&url);
        assert_eq!(q["versionDescriptor.version"], "develop");
        assert_eq!(q["versionDescriptor.versionType"], "branch");
    }

    #[test]
    fn test_download_url_without_repo_id() {
        let f = FileResult::new(
            "org",
            ProjectRef::new("pid", "proj"),
            RepositoryRef::new("", "my-repo"),
            "/test.txt",
            "main",
            None,
        )
        .unwrap();
        let url = f.download_url().unwrap();
        assert!(url.path().contains("/repositories/my-repo/items"));
    }

    #[test]
    fn test_download_url_is_deterministic() {
        let f = file("/src/app.py", Some("abc"));
        assert_eq!(f.download_url().unwrap(), f.download_url().unwrap());
        assert_eq!(f.download_url().unwrap(), f.clone().download_url().unwrap());
    }

    #[test]
    fn test_download_url_with_custom_base() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let url = file("/x.txt", None).download_url_with_base(&base).unwrap();
        assert!(url
            .as_str()
            .starts_with("http://127.0.0.1:8080/my-org/my-project/_apis/git/"));
    }

    #[test]
    fn test_empty_commit_is_treated_as_missing() {
        let f = file("/x.txt", Some(""));
        assert_eq!(f.commit_id(), None);
    }

    #[test]
    fn test_display() {
        let s = file("/src/code.py", None).to_string();
        assert_eq!(s, "my-repo:/src/code.py (branch: develop)");
    }

    #[test]
    fn test_serde_replay() {
        let f = file("/src/app.py", Some("abc"));
        let json = serde_json::to_string(&f).unwrap();
        let back: FileResult = serde_json::from_str(&json).unwrap();
        assert_eq!(f.download_url().unwrap(), back.download_url().unwrap());
    }

    #[test]
    fn test_deserialize_validates() {
        let f = file("/src/a.txt", Some("abc"));
        let mut value = serde_json::to_value(&f).unwrap();

        value["filepath"] = "/src/".into();
        assert!(serde_json::from_value::<FileResult>(value.clone()).is_err());

        value["filepath"] = "/src/a.txt".into();
        value["repository"]["name"] = "../escape".into();
        let err = serde_json::from_value::<FileResult>(value).unwrap_err();
        assert!(err.to_string().contains("../escape"), "{}", err);
    }
}
