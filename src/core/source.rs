//! Where the path list comes from, and how to get it.
//!
//! A locator is an `http(s)` URL, `-` for stdin, or a local file path.  Every
//! failure carries the locator so callers can name it to the user.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::debug;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ───────────────────────────────────────── locator ───────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    Remote(Url),
    File(PathBuf),
    Stdin,
}

impl SourceLocator {
    pub fn parse(raw: &str) -> Self {
        if raw == "-" {
            return Self::Stdin;
        }
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::File(PathBuf::from(raw)),
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not reach {locator}: {source}")]
    Unreachable {
        locator: SourceLocator,
        #[source]
        source: reqwest::Error,
    },
    #[error("timed out fetching {locator}")]
    TimedOut { locator: SourceLocator },
    #[error("{locator} answered with status {status}")]
    Status {
        locator: SourceLocator,
        status: reqwest::StatusCode,
    },
    #[error("could not read {locator}: {source}")]
    Io {
        locator: SourceLocator,
        #[source]
        source: std::io::Error,
    },
    #[error("{locator} returned non-text content")]
    NotText { locator: SourceLocator },
}

impl FetchError {
    pub fn locator(&self) -> &SourceLocator {
        match self {
            Self::Unreachable { locator, .. }
            | Self::TimedOut { locator }
            | Self::Status { locator, .. }
            | Self::Io { locator, .. }
            | Self::NotText { locator } => locator,
        }
    }
}

// ───────────────────────────────────────── fetcher ───────────

/// Fetches path lists.  Cheap to clone; clones share one HTTP client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Like [`Fetcher::new`], but remote requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, locator: &SourceLocator) -> Result<String, FetchError> {
        debug!(%locator, "fetching path list");
        let bytes = match locator {
            SourceLocator::Remote(url) => self.fetch_remote(locator, url).await?,
            SourceLocator::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| FetchError::Io {
                        locator: locator.clone(),
                        source,
                    })?
            }
            SourceLocator::Stdin => {
                let mut buf = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut buf)
                    .await
                    .map_err(|source| FetchError::Io {
                        locator: locator.clone(),
                        source,
                    })?;
                buf
            }
        };
        decode_text(locator, bytes)
    }

    async fn fetch_remote(&self, locator: &SourceLocator, url: &Url) -> Result<Vec<u8>, FetchError> {
        let network = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::TimedOut {
                    locator: locator.clone(),
                }
            } else {
                FetchError::Unreachable {
                    locator: locator.clone(),
                    source,
                }
            }
        };

        let res = self.client.get(url.clone()).send().await.map_err(network)?;
        if !res.status().is_success() {
            return Err(FetchError::Status {
                locator: locator.clone(),
                status: res.status(),
            });
        }
        let body = res.bytes().await.map_err(network)?;
        Ok(body.to_vec())
    }
}

fn decode_text(locator: &SourceLocator, bytes: Vec<u8>) -> Result<String, FetchError> {
    String::from_utf8(bytes).map_err(|_| FetchError::NotText {
        locator: locator.clone(),
    })
}
