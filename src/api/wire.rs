//! JSON shapes of the Azure DevOps REST API.
//!
//! Every field is optional on the wire; [`CodeSearchItem::into_file_result`]
//! and [`RepositoryItem::into_repository_result`] check that the fields the
//! result model needs are present and fail with [`Error::Parse`] otherwise.

use crate::error::{Error, Result};
use crate::model::{FileResult, ProjectRef, RepositoryRef, RepositoryResult};

use serde::{Deserialize, Serialize};

/// Body of a `codesearchresults` request.
#[derive(Debug, Serialize)]
pub struct CodeSearchRequest<'a> {
    #[serde(rename = "searchText")]
    pub search_text: &'a str,
    #[serde(rename = "$skip")]
    pub skip: usize,
    #[serde(rename = "$top")]
    pub top: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters<'a>>,
    #[serde(rename = "includeFacets")]
    pub include_facets: bool,
}

/// Scope filters of a code search request.
#[derive(Debug, Serialize)]
pub struct SearchFilters<'a> {
    #[serde(rename = "Project")]
    pub project: Vec<&'a str>,
}

/// Response of a `codesearchresults` request.
#[derive(Debug, Default, Deserialize)]
pub struct CodeSearchResponse {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub results: Vec<CodeSearchItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamedRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRef {
    pub branch_name: Option<String>,
    pub change_id: Option<String>,
}

/// One file match of a code search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSearchItem {
    pub file_name: Option<String>,
    pub path: Option<String>,
    pub project: Option<NamedRef>,
    pub repository: Option<NamedRef>,
    #[serde(default)]
    pub versions: Vec<VersionRef>,
}

impl CodeSearchItem {
    /// Validate the item and turn it into a [`FileResult`] of `organization`.
    pub fn into_file_result(self, organization: &str) -> Result<FileResult> {
        const CONTEXT: &str = "code search result";

        let path = require(self.path, CONTEXT, "path")?;
        let project = self
            .project
            .ok_or_else(|| Error::parse(CONTEXT, "missing field `project`"))?;
        let repository = self
            .repository
            .ok_or_else(|| Error::parse(CONTEXT, "missing field `repository`"))?;
        let version = self
            .versions
            .into_iter()
            .next()
            .ok_or_else(|| Error::parse(CONTEXT, format!("no version listed for {}", path)))?;

        let branch = require(version.branch_name, CONTEXT, "versions[0].branchName")?;
        let branch = branch
            .strip_prefix("refs/heads/")
            .map(String::from)
            .unwrap_or(branch);

        FileResult::new(
            organization,
            ProjectRef::new(
                require(project.id, CONTEXT, "project.id")?,
                require(project.name, CONTEXT, "project.name")?,
            ),
            RepositoryRef::new(
                require(repository.id, CONTEXT, "repository.id")?,
                require(repository.name, CONTEXT, "repository.name")?,
            ),
            path,
            branch,
            Some(require(version.change_id, CONTEXT, "versions[0].changeId")?),
        )
        .map_err(|e| Error::parse(CONTEXT, e))
    }
}

/// Response of a `git/repositories` request.
#[derive(Debug, Default, Deserialize)]
pub struct RepositoryListResponse {
    #[serde(default)]
    pub value: Vec<RepositoryItem>,
}

/// One repository of a listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub project: Option<NamedRef>,
    pub web_url: Option<String>,
    pub remote_url: Option<String>,
}

impl RepositoryItem {
    /// Validate the item and turn it into a [`RepositoryResult`] of `organization`.
    pub fn into_repository_result(self, organization: &str) -> Result<RepositoryResult> {
        const CONTEXT: &str = "repository listing";

        let project = self
            .project
            .ok_or_else(|| Error::parse(CONTEXT, "missing field `project`"))?;

        Ok(RepositoryResult::new(
            organization,
            ProjectRef::new(
                require(project.id, CONTEXT, "project.id")?,
                require(project.name, CONTEXT, "project.name")?,
            ),
            RepositoryRef::new(
                require(self.id, CONTEXT, "id")?,
                require(self.name, CONTEXT, "name")?,
            ),
            self.web_url.or(self.remote_url),
        ))
    }
}

fn require(value: Option<String>, context: &str, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::parse(context, format!("missing field `{}`", field))),
    }
}
