use futures::{StreamExt, stream};
use tracing::{error, info, warn};

use super::http::{HttpClient, HttpConfig};
use super::{DownloadError, DownloadResult, naming};
use crate::config::DownloadsConfig;
use crate::storage::{DownloadDir, SavedFile};

/// Fetches URLs into a [`DownloadDir`] with bounded concurrency
#[derive(Debug, Clone)]
pub struct Downloader {
    client: HttpClient,
    dir: DownloadDir,
    max_concurrency: usize,
}

impl Downloader {
    pub fn new(client: HttpClient, dir: DownloadDir, max_concurrency: usize) -> Self {
        Self {
            client,
            dir,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Build the HTTP client and open (creating if needed) the output directory
    pub fn from_config(config: &DownloadsConfig) -> Result<Self, DownloadError> {
        let client = HttpClient::new(HttpConfig::from(config))?;
        let dir = DownloadDir::open(&config.dir)?;
        Ok(Self::new(client, dir, config.max_concurrency))
    }

    pub fn dir(&self) -> &DownloadDir {
        &self.dir
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Download one URL. Never fails; errors become [`DownloadResult::Error`].
    pub async fn download(&self, url: &str) -> DownloadResult {
        info!(url, "Starting download");

        match self.try_download(url).await {
            Ok(file) => {
                info!(url, path = %file.path.display(), size = file.size, "Saved download");
                DownloadResult::saved(url, &file)
            }
            Err(err) => {
                warn!(url, error = %err, "Download failed");
                DownloadResult::failed(url, &err)
            }
        }
    }

    /// Download every URL, at most `max_concurrency` at a time.
    ///
    /// Returns one result per input, in input order, once all have finished.
    /// The batch runs on its own task: dropping the returned future (for
    /// example when the client disconnects) does not stop it.
    pub async fn download_all(
        &self,
        urls: Vec<String>,
    ) -> Result<Vec<DownloadResult>, DownloadError> {
        let downloader = self.clone();
        let batch = tokio::spawn(async move { downloader.run_batch(urls).await });
        Ok(batch.await?)
    }

    async fn run_batch(&self, urls: Vec<String>) -> Vec<DownloadResult> {
        stream::iter(urls)
            .map(|url| {
                let downloader = self.clone();
                async move {
                    let task = tokio::spawn({
                        let url = url.clone();
                        async move { downloader.download(&url).await }
                    });
                    match task.await {
                        Ok(result) => result,
                        Err(err) => {
                            error!(url, error = %err, "Download task aborted");
                            DownloadResult::failed(url, &DownloadError::Task(err))
                        }
                    }
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    async fn try_download(&self, url: &str) -> Result<SavedFile, DownloadError> {
        let fetched = self.client.fetch(url).await?;
        let filename = naming::choose_filename(&fetched.url, fetched.content_type.as_deref());
        let saved = self.dir.write(&filename, &fetched.body).await?;
        Ok(saved)
    }
}
