//! Forwarding of persisted event files to an HTTP endpoint.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;
use vaultline_config::PublishSection;

use crate::error::{PublishError, PublishResult};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("vaultline/", env!("CARGO_PKG_VERSION"));

/// What happened to one forwarded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReceipt {
    /// The endpoint answered 200.
    Delivered {
        /// Whether the local file was deleted afterwards.
        removed: bool,
    },
    /// The endpoint answered with any other status. The file is kept.
    Rejected {
        /// HTTP status code.
        status: u16,
    },
}

impl PublishReceipt {
    /// HTTP status code of the response.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Delivered { .. } => StatusCode::OK.as_u16(),
            Self::Rejected { status } => *status,
        }
    }

    /// Whether the endpoint accepted the event.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Sends a persisted event file somewhere.
pub trait Forwarder {
    /// Forward the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or the request does not
    /// complete. A completed request with a non-success status is a
    /// [`PublishReceipt::Rejected`], not an error.
    fn forward(&self, path: &Path) -> PublishResult<PublishReceipt>;
}

impl<F: Forwarder + ?Sized> Forwarder for &F {
    fn forward(&self, path: &Path) -> PublishResult<PublishReceipt> {
        (**self).forward(path)
    }
}

/// Blocking HTTP publisher.
///
/// The request body is read back from disk, so the endpoint receives
/// exactly the bytes that were persisted.
#[derive(Debug, Clone)]
pub struct Publisher {
    client: Client,
    endpoint: Url,
    remove_after_publish: bool,
}

impl Publisher {
    /// Create a publisher for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not `http`/`https` or the client
    /// cannot be built.
    pub fn new(endpoint: &str, timeout: Duration, remove_after_publish: bool) -> PublishResult<Self> {
        let invalid = |reason: String| PublishError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason,
        };
        let endpoint = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", endpoint.scheme())));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(PublishError::Client)?;

        Ok(Self {
            client,
            endpoint,
            remove_after_publish,
        })
    }

    /// Build a publisher from the `[publish]` section, or `None` when no
    /// endpoint is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is invalid.
    pub fn from_config(section: &PublishSection) -> PublishResult<Option<Self>> {
        section
            .endpoint()
            .map(|url| {
                Self::new(
                    url,
                    Duration::from_secs(section.timeout_secs),
                    section.remove_after_publish,
                )
            })
            .transpose()
    }

    /// Endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether delivered files are deleted.
    #[must_use]
    pub fn removes_after_publish(&self) -> bool {
        self.remove_after_publish
    }
}

impl Forwarder for Publisher {
    fn forward(&self, path: &Path) -> PublishResult<PublishReceipt> {
        let body = fs::read(path).map_err(|source| PublishError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|source| PublishError::Transport {
                url: self.endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(PublishReceipt::Rejected {
                status: status.as_u16(),
            });
        }

        let removed = self.remove_after_publish
            && match fs::remove_file(path) {
                Ok(()) => true,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "delivered file could not be removed");
                    false
                },
            };
        debug!(path = %path.display(), removed, "event delivered");
        Ok(PublishReceipt::Delivered { removed })
    }
}
