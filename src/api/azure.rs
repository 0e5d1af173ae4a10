//! Azure DevOps REST implementation of the capabilities.
//!
//! ```rust,no_run
//! use azdo_harvest::api::{AzureDevOpsClient, CodeSearch};
//!
//! # async fn example() -> Result<(), azdo_harvest::Error> {
//! let client = AzureDevOpsClient::builder("myorg", "my-pat").build()?;
//! let page = client.search_code(Some("myproject"), "TODO", None).await?;
//! println!("{} matches, more: {}", page.matches.len(), page.continuation.is_some());
//! # Ok(())
//! # }
//! ```

use super::wire::{CodeSearchRequest, CodeSearchResponse, RepositoryListResponse, SearchFilters};
use super::{CodeSearch, CodeSearchPage, ItemRetrieval, RepositoryCatalog};
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::model::{FileResult, RepositoryResult, API_VERSION, DEFAULT_BASE_URL};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, ACCEPT},
    Response, StatusCode, Url,
};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use std::fmt;
use tracing::debug;

/// Default host of the Azure DevOps search API.
pub const DEFAULT_SEARCH_URL: &str = "https://almsearch.dev.azure.com";

/// Largest `$top` the code search API accepts.
pub const MAX_PAGE_SIZE: usize = 1000;

const SEARCH_API_VERSION: &str = "7.1";

/// Which kind of call failed, to pick the matching error variant.
#[derive(Debug, Clone, Copy)]
enum Call {
    Search,
    Item,
}

impl Call {
    fn error(self, message: String) -> Error {
        match self {
            Call::Search => Error::SearchTransport(message),
            Call::Item => Error::Download(message),
        }
    }
}

/// Client for one Azure DevOps organization, authenticated with a personal
/// access token.
#[derive(Clone)]
pub struct AzureDevOpsClient {
    organization: String,
    token: String,
    base_url: Url,
    search_url: Url,
    page_size: usize,
    client: ClientWithMiddleware,
}

impl fmt::Debug for AzureDevOpsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureDevOpsClient")
            .field("organization", &self.organization)
            .field("base_url", &self.base_url.as_str())
            .field("search_url", &self.search_url.as_str())
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl AzureDevOpsClient {
    /// Start building a client for `organization`.
    pub fn builder(
        organization: impl Into<String>,
        token: impl Into<String>,
    ) -> AzureDevOpsClientBuilder {
        AzureDevOpsClientBuilder::new(organization, token)
    }

    /// Organization this client talks to.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Host used for repository listing and item retrieval.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Number of matches requested per code search page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn endpoint(&self, host: &Url, project: Option<&str>, tail: &[&str], api_version: &str) -> Result<Url> {
        let mut url = host.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::InvalidInput(format!("the url \"{}\" cannot be a base", host)))?;
            segments.pop_if_empty().push(&self.organization);
            if let Some(project) = project {
                segments.push(project);
            }
            segments.extend(tail);
        }
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder, call: Call, context: &str) -> Result<Response> {
        let response = request
            .basic_auth("", Some(&self.token))
            .send()
            .await
            .map_err(|e| call.error(format!("{}: {}", context, e)))?;

        let status = response.status();
        // A rejected PAT is sometimes answered with a 203 sign-in page.
        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NON_AUTHORITATIVE_INFORMATION
        ) {
            return Err(Error::Authentication {
                status,
                message: context.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            return Err(call.error(format!("{} returned {}: {}", context, status, body)));
        }

        Ok(response)
    }
}

#[async_trait]
impl RepositoryCatalog for AzureDevOpsClient {
    fn organization(&self) -> &str {
        &self.organization
    }

    fn supports_organization_scope(&self) -> bool {
        true
    }

    async fn list_repositories(&self, project: Option<&str>) -> Result<Vec<RepositoryResult>> {
        let url = self.endpoint(
            &self.base_url,
            project,
            &["_apis", "git", "repositories"],
            API_VERSION,
        )?;

        debug!("Requesting URL: {}", url);
        let response = self
            .execute(self.client.get(url), Call::Search, "listing repositories")
            .await?;
        let listing: RepositoryListResponse = response
            .json()
            .await
            .map_err(|e| Error::parse("repository listing", e))?;

        listing
            .value
            .into_iter()
            .map(|item| item.into_repository_result(&self.organization))
            .collect()
    }
}

#[async_trait]
impl CodeSearch for AzureDevOpsClient {
    fn organization(&self) -> &str {
        &self.organization
    }

    fn supports_organization_scope(&self) -> bool {
        true
    }

    async fn search_code(
        &self,
        project: Option<&str>,
        term: &str,
        continuation: Option<&str>,
    ) -> Result<CodeSearchPage> {
        let skip = match continuation {
            Some(token) => token.parse::<usize>().map_err(|_| {
                Error::InvalidInput(format!("invalid continuation token \"{}\"", token))
            })?,
            None => 0,
        };

        let url = self.endpoint(
            &self.search_url,
            project,
            &["_apis", "search", "codesearchresults"],
            SEARCH_API_VERSION,
        )?;
        let body = CodeSearchRequest {
            search_text: term,
            skip,
            top: self.page_size,
            filters: project.map(|p| SearchFilters { project: vec![p] }),
            include_facets: false,
        };

        debug!("Requesting URL: {} (skip {})", url, skip);
        let response = self
            .execute(self.client.post(url).json(&body), Call::Search, "searching code")
            .await?;
        let page: CodeSearchResponse = response
            .json()
            .await
            .map_err(|e| Error::parse("code search response", e))?;

        let received = page.results.len();
        let next = skip + received;
        let exhausted = received == 0
            || received < self.page_size
            || page.count.is_some_and(|count| next >= count);

        let matches = page
            .results
            .into_iter()
            .map(|item| item.into_file_result(&self.organization))
            .collect::<Result<Vec<_>>>()?;

        Ok(CodeSearchPage {
            matches,
            continuation: (!exhausted).then(|| next.to_string()),
        })
    }
}

#[async_trait]
impl ItemRetrieval for AzureDevOpsClient {
    async fn get_item(&self, file: &FileResult) -> Result<Vec<u8>> {
        let url = file.download_url_with_base(&self.base_url)?;
        let context = format!("fetching {}", file);

        debug!("Fetching {}", url);
        let request = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/octet-stream"));
        let response = self.execute(request, Call::Item, &context).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Download(format!("{}: {}", context, e)))?;

        Ok(bytes.to_vec())
    }
}

/// A builder used to create an [`AzureDevOpsClient`].
#[derive(Debug)]
pub struct AzureDevOpsClientBuilder {
    organization: String,
    token: String,
    base_url: Option<String>,
    search_url: Option<String>,
    page_size: usize,
    http: HttpClientConfig,
}

impl AzureDevOpsClientBuilder {
    /// Creates a builder with the default endpoints.
    pub fn new(organization: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            token: token.into(),
            base_url: None,
            search_url: None,
            page_size: 100,
            http: HttpClientConfig::default(),
        }
    }

    /// Host for repository listing and item retrieval.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Host for code search.
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = Some(url.into());
        self
    }

    /// Number of matches per code search page, clamped to `1..=1000`.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Set the number of retries for transient failures.
    pub fn retries(mut self, retries: u32) -> Self {
        self.http.retries = retries;
        self
    }

    /// Replace the HTTP client configuration.
    pub fn http_config(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Create the [`AzureDevOpsClient`] with the specified options.
    pub fn build(self) -> Result<AzureDevOpsClient> {
        if self.organization.trim().is_empty() {
            return Err(Error::InvalidInput("organization must not be empty".into()));
        }
        if self.token.trim().is_empty() {
            return Err(Error::InvalidInput("access token must not be empty".into()));
        }

        let parse = |value: Option<String>, default: &str| {
            let value = value.unwrap_or_else(|| default.to_string());
            Url::parse(&value)
                .map_err(|e| Error::InvalidInput(format!("the url \"{}\" cannot be parsed: {}", value, e)))
        };

        Ok(AzureDevOpsClient {
            base_url: parse(self.base_url, DEFAULT_BASE_URL)?,
            search_url: parse(self.search_url, DEFAULT_SEARCH_URL)?,
            organization: self.organization,
            token: self.token,
            page_size: self.page_size,
            client: create_http_client(self.http)?,
        })
    }
}
