//! Customer sync endpoint client.
//!
//! One POST per batch, no retries. The Basic credential is encoded once when
//! the client is built.

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::record::SyncBatch;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Builds the blocking HTTP client shared by every outbound call.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Counts reported by the sync endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SyncResponse {
    pub created_count: i64,
    pub updated_count: i64,
    pub error_count: i64,
}

/// Unparsed endpoint reply.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Checks the status and the reported error count.
    pub fn validate(&self) -> Result<SyncResponse> {
        if self.status != StatusCode::OK {
            return Err(SyncError::SyncStatus {
                status: self.status.as_u16(),
                body: self.body.clone(),
            });
        }

        let counts: SyncResponse = serde_json::from_str(&self.body)?;
        if counts.error_count != 0 {
            return Err(SyncError::SyncErrors {
                error_count: counts.error_count,
            });
        }
        Ok(counts)
    }
}

pub struct SyncClient {
    http: Client,
    endpoint: String,
    authorization: HeaderValue,
}

impl SyncClient {
    pub fn new(config: &SyncConfig, http: Client) -> Result<Self> {
        let token = STANDARD.encode(format!("{}:{}", config.username, config.password));
        let mut authorization = HeaderValue::from_str(&format!("Basic {}", token))
            .map_err(|e| SyncError::Config(format!("invalid sync credentials: {e}")))?;
        authorization.set_sensitive(true);

        Ok(SyncClient {
            http,
            endpoint: config.endpoint(),
            authorization,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one batch and returns the reply as-is.
    pub fn post_batch(&self, batch: &SyncBatch) -> Result<RawResponse> {
        let payload = serde_json::to_vec(batch)?;
        debug!(
            "Posting {} customers ({} bytes) to {}",
            batch.len(),
            payload.len(),
            self.endpoint
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(AUTHORIZATION, self.authorization.clone())
            .body(payload)
            .send()
            .map_err(|e| SyncError::transport(&self.endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SyncError::transport(&self.endpoint, e))?;
        Ok(RawResponse { status, body })
    }

    /// Posts one batch and fails unless every record was accepted.
    pub fn sync(&self, batch: &SyncBatch) -> Result<SyncResponse> {
        let counts = self.post_batch(batch)?.validate()?;
        info!(
            "Customer sync accepted: {} created, {} updated",
            counts.created_count, counts.updated_count
        );
        Ok(counts)
    }
}
