//! Upstream fetch error type and its mapping onto attempt results.

use crate::retry::{AttemptResult, TransportFailureKind};
use thiserror::Error;

/// Error from a single upstream GET, before retry classification.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u16),
    /// 2xx response with a body that is not JSON.
    #[error("HTTP {status}: invalid JSON body: {source}")]
    InvalidBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Classify a curl error into a transport failure kind.
pub fn classify_curl_error(e: &curl::Error) -> TransportFailureKind {
    if e.is_operation_timedout() {
        return TransportFailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportFailureKind::Connect;
    }
    TransportFailureKind::Other
}

impl From<FetchError> for AttemptResult {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Curl(ce) => AttemptResult::transport(classify_curl_error(&ce), ce.to_string()),
            FetchError::Http(status) => AttemptResult::http(status),
            FetchError::InvalidBody { status, source } => AttemptResult::MalformedBody {
                status,
                detail: source.to_string(),
            },
        }
    }
}
