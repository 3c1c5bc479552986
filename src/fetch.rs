//! Fetch-and-decode orchestration.
//!
//! [`FeedLoader`] downloads a feed over HTTP and decodes it with the parser
//! of the requested [`WebFeed`] type. Decoding runs on Tokio's blocking pool,
//! never on the task that asked for the feed. Results are delivered as a
//! future ([`FeedLoader::load`]), over a one-shot channel
//! ([`FeedLoader::spawn_load`]) or to a completion closure
//! ([`FeedLoader::load_with`]). Every path produces exactly one result.
//!
//! Nothing here retries; a failed fetch is reported as-is.
//!
//! # Example
//!
//! ```rust,no_run
//! use nucleus_rs::fetch::{FeedLoader, LoaderConfig};
//! use nucleus_rs::objects::RssFeed;
//!
//! # async fn run() -> nucleus_rs::Result<()> {
//! let loader = FeedLoader::new(LoaderConfig::default())?;
//! let feed: RssFeed = loader.load("https://example.com/feed.xml").await?;
//! println!("{} ({} items)", feed.title, feed.item_count());
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::objects::{FeedParser, WebFeed, DEFAULT_LOCALE};
use crate::reader::ParserConfig;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default response size limit (10 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Configuration options for the feed loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Locale handed to feed parsers
    pub locale: String,
    /// Timeout for the whole request
    pub timeout: Duration,
    /// Largest accepted response body, in bytes
    pub max_body_size: usize,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Whether parsers trim whitespace around element text
    pub trim_text: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            user_agent: format!("nucleus-rs/{}", crate::VERSION),
            trim_text: true,
        }
    }
}

impl LoaderConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locale handed to parsers.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the response size limit.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets whether parsers trim element text.
    pub fn with_trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    /// Returns the parser configuration derived from these settings.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new()
            .with_locale(self.locale.clone())
            .with_trim_text(self.trim_text)
    }
}

/// Parses a feed location, accepting only http and https URLs.
pub fn parse_feed_url(location: &str) -> Result<Url> {
    let url = Url::parse(location.trim()).map_err(|source| Error::InvalidUrl {
        url: location.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::UnsupportedScheme(scheme.to_string())),
    }
}

/// Downloads and decodes feeds.
///
/// Cloning a loader is cheap; clones share the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
    config: LoaderConfig,
}

impl FeedLoader {
    /// Creates a loader with its own HTTP client.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetches and decodes the feed at `location`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] / [`Error::UnsupportedScheme`] before any
    ///   request is made
    /// - [`Error::Http`], [`Error::HttpStatus`], [`Error::ResponseTooLarge`]
    ///   for transport failures
    /// - [`Error::InvalidData`] for an empty body, plus any error of the
    ///   feed parser
    pub async fn load<T: WebFeed>(&self, location: &str) -> Result<T> {
        let url = parse_feed_url(location)?;
        self.load_url(url).await
    }

    /// Fetches and decodes the feed at an already parsed URL.
    pub async fn load_url<T: WebFeed>(&self, url: Url) -> Result<T> {
        let data = self.fetch(&url).await?;
        let parser = T::create_parser(self.config.parser_config());

        tokio::task::spawn_blocking(move || parser.parse(&data))
            .await
            .map_err(|e| Error::Join(e.to_string()))?
    }

    /// Starts loading in a background task and returns a receiver for the
    /// result.
    ///
    /// An invalid location is sent immediately without spawning anything.
    /// Must be called from within a Tokio runtime.
    pub fn spawn_load<T: WebFeed>(&self, location: &str) -> oneshot::Receiver<Result<T>> {
        let (tx, rx) = oneshot::channel();

        let url = match parse_feed_url(location) {
            Ok(url) => url,
            Err(e) => {
                let _ = tx.send(Err(e));
                return rx;
            }
        };

        let loader = self.clone();
        tokio::spawn(async move {
            let result = loader.load_url::<T>(url).await;
            if tx.send(result).is_err() {
                tracing::debug!("feed result dropped, receiver went away");
            }
        });
        rx
    }

    /// Loads in a background task and hands the result to `completion`.
    ///
    /// `completion` runs exactly once, on the spawned task. Must be called
    /// from within a Tokio runtime.
    pub fn load_with<T, F>(&self, location: &str, completion: F) -> JoinHandle<()>
    where
        T: WebFeed,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let loader = self.clone();
        let location = location.to_string();
        tokio::spawn(async move {
            let result = loader.load::<T>(&location).await;
            completion(result);
        })
    }

    /// Issues one GET request and returns the body.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!(url = %url, "fetching feed");

        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "feed request failed");
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let limit = self.config.max_body_size;
        if let Some(len) = response.content_length() {
            if len > limit as u64 {
                return Err(Error::ResponseTooLarge(limit));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(Error::ResponseTooLarge(limit));
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(Error::InvalidData("empty response body".to_string()));
        }

        tracing::debug!(url = %url, bytes = body.len(), "feed downloaded");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_feed_url() {
        let url = parse_feed_url(" https://example.com/rss.xml ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));

        let err = parse_feed_url("not a url").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);

        let err = parse_feed_url("ftp://example.com/rss.xml").unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(ref s) if s == "ftp"));
    }

    #[test]
    fn test_loader_config_builder() {
        let config = LoaderConfig::new()
            .with_locale("en_GB")
            .with_timeout(Duration::from_secs(5))
            .with_max_body_size(1024)
            .with_user_agent("test-agent");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_body_size, 1024);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.parser_config().locale, "en_GB");
        assert!(config.parser_config().trim_text);
        assert!(!config.with_trim_text(false).parser_config().trim_text);
    }

    #[test]
    fn test_default_user_agent() {
        let config = LoaderConfig::default();
        assert!(config.user_agent.starts_with("nucleus-rs/"));
    }
}
