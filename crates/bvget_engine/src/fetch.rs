use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{REFERER, USER_AGENT};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::{EngineEvent, FailureKind, FetchError, FetchTarget, ItemError};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    /// `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,
    /// `None` waits indefinitely. Applies to whole stream downloads too.
    pub request_timeout: Option<Duration>,
    pub redirect_limit: usize,
    /// Upper bound for page markup; stream downloads are not capped.
    pub max_page_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: None,
            request_timeout: None,
            redirect_limit: 5,
            max_page_bytes: 5 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Receives `(bytes so far, declared total)` while a stream downloads.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, bytes: u64, total: Option<u64>);
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// GET the page markup. The referer is the page itself.
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// Stream `target.url` into `target.destination`, returning the byte count.
    async fn download(
        &self,
        target: &FetchTarget,
        referer: &str,
        observer: &dyn ProgressObserver,
    ) -> Result<u64, ItemError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(self.settings.redirect_limit));
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    async fn get(&self, url: &str, referer: &str) -> Result<reqwest::Response, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .get(parsed)
            .header(USER_AGENT, &self.settings.user_agent)
            .header(REFERER, referer)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status} for {url}"),
            ));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url, url).await?;
        let max_bytes = self.settings.max_page_bytes;
        let too_large = |actual| {
            FetchError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(actual),
                },
                "page too large",
            )
        };

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn download(
        &self,
        target: &FetchTarget,
        referer: &str,
        observer: &dyn ProgressObserver,
    ) -> Result<u64, ItemError> {
        let response = self.get(&target.url, referer).await?;
        let total = response.content_length();

        let mut file = File::create(&target.destination).await?;
        let mut written: u64 = 0;
        observer.on_progress(written, total);

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            observer.on_progress(written, total);
        }
        file.flush().await?;
        file.sync_all().await?;

        Ok(written)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
