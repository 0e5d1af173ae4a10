//! Core downloader implementation with the worker pool and fetch logic.
//!
//! ```rust,no_run
//! use azdo_harvest::{AzureDevOpsClient, DownloaderBuilder, SearchQuery, Searcher};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), azdo_harvest::Error> {
//! let client = Arc::new(AzureDevOpsClient::builder("myorg", "my-pat").build()?);
//! let results = Searcher::new(client.clone())
//!     .search(&SearchQuery::new("file:Dockerfile").project("myproject"))
//!     .await?;
//!
//! let downloader = DownloaderBuilder::new(client)
//!     .directory(PathBuf::from("./downloads"))
//!     .build();
//! for outcome in downloader.download_all(&results.files).await? {
//!     println!("{} -> {:?}", outcome.file(), outcome.path());
//! }
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use crate::api::ItemRetrieval;
use crate::download::hash::{self, output_filename, output_filename_with_len, verify_digest};
use crate::download::{DownloadOutcome, DownloadRequest};
use crate::error::{Error, Result};
use crate::model::FileResult;
use crate::progress::ProgressDisplay;

use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Files waiting to be claimed, tagged with their input position.
type PendingQueue = Mutex<VecDeque<(usize, DownloadRequest)>>;

/// Outcomes by input position.
type OutcomeSlots = Mutex<Vec<Option<DownloadOutcome>>>;

/// Represents the download controller.
///
/// A downloader can be created via its [`DownloaderBuilder`](super::DownloaderBuilder).
/// It keeps no state between calls.
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
    fetcher: Arc<dyn ItemRetrieval>,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig, fetcher: Arc<dyn ItemRetrieval>) -> Self {
        Self { config, fetcher }
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the number of concurrent workers.
    pub fn concurrency(&self) -> usize {
        self.config.concurrency
    }

    /// Gets whether existing files with identical content are rewritten.
    pub fn overwrite(&self) -> bool {
        self.config.overwrite
    }

    /// Fetch the content of `file` without writing it to disk.
    pub async fn get_file_content(&self, file: &FileResult) -> Result<Vec<u8>> {
        self.fetcher.get_item(file).await
    }

    /// Download every file in `files`.
    ///
    /// See [`Downloader::download_requests`].
    pub async fn download_all(&self, files: &[FileResult]) -> Result<Vec<DownloadOutcome>> {
        self.download_requests(files.iter().map(DownloadRequest::from).collect())
            .await
    }

    /// Download every request, verifying digests where one is expected.
    ///
    /// Returns one outcome per request, in input order. Per-file failures are
    /// recorded in the outcomes; the call itself only fails when the
    /// concurrency is zero or the output directory cannot be created.
    pub async fn download_requests(
        &self,
        requests: Vec<DownloadRequest>,
    ) -> Result<Vec<DownloadOutcome>> {
        if self.config.concurrency < 1 {
            return Err(Error::InvalidInput(
                "concurrency must be at least 1".into(),
            ));
        }

        debug!("Creating destination directory {:?}", self.config.directory);
        fs::create_dir_all(&self.config.directory).await?;

        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let total = requests.len();
        let workers = self.config.concurrency.min(total);
        let files: Vec<FileResult> = requests.iter().map(|r| r.file.clone()).collect();

        // Dropping this future cancels the token: workers finish the file in
        // hand and stop claiming.
        let token = self
            .config
            .cancel
            .as_ref()
            .map(CancellationToken::child_token)
            .unwrap_or_else(CancellationToken::new);
        let _guard = token.clone().drop_guard();

        let queue: Arc<PendingQueue> = Arc::new(Mutex::new(requests.into_iter().enumerate().collect()));
        let slots: Arc<OutcomeSlots> = Arc::new(Mutex::new(vec![None; total]));
        let progress = Arc::new(ProgressDisplay::new(
            self.config.style_options.clone(),
            total,
        ));

        info!("Downloading {} files with {} workers", total, workers);
        let handles = (0..workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    downloader: self.clone(),
                    queue: queue.clone(),
                    slots: slots.clone(),
                    progress: progress.clone(),
                    token: token.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect::<Vec<_>>();

        for (id, result) in join_all(handles).await.into_iter().enumerate() {
            if let Err(e) = result {
                warn!("Download worker {} stopped early: {}", id, e);
            }
        }
        progress.finish();

        let unclaimed: HashSet<usize> = lock(&queue).iter().map(|(index, _)| *index).collect();
        let cancelled = token.is_cancelled();
        let slots = std::mem::take(&mut *lock(&slots));
        let outcomes = slots
            .into_iter()
            .zip(files)
            .enumerate()
            .map(|(index, (outcome, file))| {
                outcome.unwrap_or_else(|| {
                    let reason = match (unclaimed.contains(&index), cancelled) {
                        (true, true) => "cancelled before the download started",
                        (true, false) => "not attempted, the download workers stopped",
                        (false, _) => "download worker stopped unexpectedly",
                    };
                    DownloadOutcome::failed(file, reason)
                })
            })
            .collect::<Vec<_>>();

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            "Downloaded {} of {} files to {:?}",
            succeeded, total, self.config.directory
        );
        Ok(outcomes)
    }

    /// Fetch one file, verify it and write it to disk.
    async fn fetch(&self, request: &DownloadRequest) -> DownloadOutcome {
        let file = &request.file;

        debug!("Fetching {}", file);
        let bytes = match self.fetcher.get_item(file).await {
            Ok(bytes) => bytes,
            Err(e) => return DownloadOutcome::failed(file.clone(), e),
        };

        let digest = hash::digest(&bytes);
        if let Err(e) = verify_digest(&digest, request.expected_digest.as_deref()) {
            warn!("Digest mismatch for {}: {}", file, e);
            return DownloadOutcome::hash_mismatch(file.clone(), digest, e);
        }

        let directory = self.config.directory.clone();
        let repository = file.repository().name.clone();
        let filename = file.filename().to_string();
        let overwrite = self.config.overwrite;
        let stored_digest = digest.clone();
        let stored = tokio::task::spawn_blocking(move || {
            store(&directory, &repository, &filename, &bytes, &stored_digest, overwrite)
        })
        .await
        .unwrap_or_else(|e| Err(Error::Internal(format!("write task failed: {}", e))));

        match stored {
            Ok(path) => DownloadOutcome::succeeded(file.clone(), path, digest),
            Err(e) => DownloadOutcome::failed(file.clone(), e),
        }
    }
}

/// One member of the worker pool.
struct Worker {
    id: usize,
    downloader: Downloader,
    queue: Arc<PendingQueue>,
    slots: Arc<OutcomeSlots>,
    progress: Arc<ProgressDisplay>,
    token: CancellationToken,
}

impl Worker {
    async fn run(self) {
        loop {
            if self.token.is_cancelled() {
                debug!("Worker {} cancelled", self.id);
                break;
            }

            let next = lock(&self.queue).pop_front();
            let Some((index, request)) = next else {
                break;
            };

            let pb = self.progress.create_child(&request.file);
            let outcome = match AssertUnwindSafe(self.downloader.fetch(&request))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(panic) => {
                    warn!("Worker {} panicked while fetching {}", self.id, request.file);
                    DownloadOutcome::failed(
                        request.file.clone(),
                        format!("download panicked: {}", panic_message(&*panic)),
                    )
                }
            };
            self.progress.finish_child(pb);
            self.progress.increment_main();

            lock(&self.slots)[index] = Some(outcome.clone());

            if let Some(ref callback) = self.downloader.config.on_complete {
                if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| callback(&outcome))) {
                    warn!(
                        "Completion callback panicked for {}: {}",
                        outcome.file(),
                        panic_message(&*panic)
                    );
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Write `bytes` under their derived name in `directory` and return the path.
///
/// The content goes to a temporary file in `directory` first and is renamed
/// into place, so a truncated file is never visible under its final name.
fn store(
    directory: &Path,
    repository: &str,
    filename: &str,
    bytes: &[u8],
    digest: &str,
    overwrite: bool,
) -> Result<PathBuf> {
    let mut target = directory.join(output_filename(repository, filename, digest));

    if target.exists() {
        if hash::file_digest(&target)? == digest {
            if !overwrite {
                debug!("{:?} already holds this content", target);
                return Ok(target);
            }
        } else {
            warn!(
                "{:?} holds different content with the same digest prefix, using the full digest",
                target
            );
            target = directory.join(output_filename_with_len(
                repository,
                filename,
                digest,
                digest.len(),
            ));
            if target.exists() && !overwrite {
                return Ok(target);
            }
        }
    }

    debug!("Writing {} bytes to {:?}", bytes.len(), target);
    let mut temp = tempfile::NamedTempFile::new_in(directory)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(&target).map_err(|e| Error::IOError { source: e.error })?;

    Ok(target)
}
