//! Upstream HTTP transport.
//!
//! Uses the curl crate (libcurl) for a single GET per attempt and
//! pre-classifies every failure into an [`AttemptResult`] so the retry loop
//! never sees raw transport errors.

mod error;

pub use error::{classify_curl_error, FetchError};

use crate::retry::{AttemptResult, TransportFailureKind};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::time::Duration;

/// Path of the data endpoint, relative to the upstream base URL.
pub const DATA_PATH: &str = "/api/data";

/// Client for the upstream data endpoint. Cheap to clone; holds no connection state.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    data_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Builds a client for `<base_url>/api/data`. `base_url` must be http or https.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("invalid upstream URL {:?}", base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("unsupported upstream URL scheme {:?}", parsed.scheme());
        }
        let data_url = format!("{}{}", base_url.trim_end_matches('/'), DATA_PATH);
        Ok(Self { data_url, timeout })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// One GET attempt. Runs on a blocking thread so the caller's runtime stays free.
    pub async fn get(&self) -> AttemptResult {
        let client = self.clone();
        match tokio::task::spawn_blocking(move || client.get_blocking()).await {
            Ok(result) => result,
            Err(e) => AttemptResult::transport(
                TransportFailureKind::Other,
                format!("transport task failed: {}", e),
            ),
        }
    }

    /// One GET attempt in the current thread.
    pub fn get_blocking(&self) -> AttemptResult {
        match self.fetch() {
            Ok((status, payload)) => AttemptResult::success(status, payload),
            Err(e) => {
                tracing::debug!("GET {} failed: {}", self.data_url, e);
                e.into()
            }
        }
    }

    fn fetch(&self) -> Result<(u16, Value), FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&self.data_url)?;
        easy.get(true)?;
        easy.follow_location(false)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;
        let mut list = curl::easy::List::new();
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()? as u16;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http(status));
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok((status, Value::Null));
        }
        let payload = serde_json::from_slice(&body)
            .map_err(|source| FetchError::InvalidBody { status, source })?;
        Ok((status, payload))
    }
}
