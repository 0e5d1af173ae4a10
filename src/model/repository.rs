//! Repository search results and the name/id references shared by all results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A project within an organization, identified by name and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project GUID.
    pub id: String,
    /// Human readable project name.
    pub name: String,
}

impl ProjectRef {
    /// Creates a new [`ProjectRef`].
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A git repository within a project, identified by name and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository GUID.
    pub id: String,
    /// Human readable repository name.
    pub name: String,
}

impl RepositoryRef {
    /// Creates a new [`RepositoryRef`].
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The identifier used in REST paths: the id, or the name when no id is known.
    pub fn identifier(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// A repository whose name matched a search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryResult {
    organization: String,
    project: ProjectRef,
    repository: RepositoryRef,
    url: Option<String>,
}

impl RepositoryResult {
    /// Creates a new [`RepositoryResult`].
    pub fn new(
        organization: impl Into<String>,
        project: ProjectRef,
        repository: RepositoryRef,
        url: Option<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project,
            repository,
            url,
        }
    }

    /// Organization the repository lives in.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Owning project.
    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    /// Repository name and id.
    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.repository.name
    }

    /// Repository id.
    pub fn id(&self) -> &str {
        &self.repository.id
    }

    /// Web URL of the repository, when the platform reported one.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl fmt::Display for RepositoryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project.name, self.repository.name)
    }
}
