//! Walrus blob archival for generated images.
//!
//! Archival is best-effort: the backend serves the image to the caller
//! regardless, and only logs when the archive write fails.

use std::time::Duration;

use reqwest::Client;

/// Errors from archiving a blob.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Publisher returned a non-success status.
    #[error("publisher error: HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for the logs.
        body: String,
    },

    /// Publisher response carried no blob id in any known shape.
    #[error("publisher response missing blob id")]
    MissingBlobId,
}

/// Uploads image bytes to a Walrus publisher and returns aggregator URLs.
#[derive(Debug, Clone)]
pub struct WalrusArchiver {
    client: Client,
    publisher_url: String,
    aggregator_url: String,
    epochs: u32,
    max_attempts: u32,
}

impl WalrusArchiver {
    /// Create an archiver for the given publisher/aggregator pair.
    ///
    /// `epochs` is how many storage epochs the blob is paid for.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(
        publisher_url: impl Into<String>,
        aggregator_url: impl Into<String>,
        epochs: u32,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            publisher_url: publisher_url.into().trim_end_matches('/').to_string(),
            aggregator_url: aggregator_url.into().trim_end_matches('/').to_string(),
            epochs,
            max_attempts: 3,
        }
    }

    /// Store image bytes and return the public aggregator URL.
    ///
    /// Retries transient publisher failures with a short linear backoff.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once all attempts are exhausted.
    pub async fn store(&self, image: &[u8]) -> Result<String, ArchiveError> {
        let mut last_err = ArchiveError::MissingBlobId;

        for attempt in 1..=self.max_attempts {
            match self.try_store(image).await {
                Ok(blob_id) => {
                    return Ok(format!("{}/v1/{blob_id}", self.aggregator_url));
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Walrus upload failed"
                    );
                    last_err = e;
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(Duration::from_millis(500 * u64::from(attempt))).await;
            }
        }

        Err(last_err)
    }

    async fn try_store(&self, image: &[u8]) -> Result<String, ArchiveError> {
        let url = format!("{}/v1/blobs?epochs={}", self.publisher_url, self.epochs);

        let response = self
            .client
            .put(&url)
            .header("Content-Type", "image/jpeg")
            .body(image.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArchiveError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        extract_blob_id(&body).ok_or(ArchiveError::MissingBlobId)
    }
}

/// Pull the blob id out of the publisher response.
///
/// The publisher answers in one of three shapes depending on whether the
/// blob is new, already certified, or returned by a simplified endpoint.
fn extract_blob_id(body: &serde_json::Value) -> Option<String> {
    body.get("blobId")
        .or_else(|| {
            body.get("newlyCreated")
                .and_then(|v| v.get("blobObject"))
                .and_then(|v| v.get("blobId"))
        })
        .or_else(|| body.get("alreadyCertified").and_then(|v| v.get("blobId")))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
