//! Error types for the Salesforce API layer
//!
//! Each stage of the client has its own error kind so callers can tell where
//! a chain stopped. Errors are plain values; nothing here is raised.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Failure inside the transport itself (connection, TLS, body decoding)
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}

/// Failure of a single API call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Any non-200 response, whatever the endpoint
    #[error("API request failed with status {status_code}: {body}")]
    Status { status_code: u16, body: Value },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 200 response whose body does not have the documented shape
    #[error("unexpected response from {endpoint}: {detail}")]
    MalformedBody { endpoint: String, detail: String },
}

impl ApiError {
    pub fn malformed(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedBody {
            endpoint: endpoint.into(),
            detail: detail.into(),
        }
    }

    /// HTTP status code, when the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Failure to obtain an access token
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint response is missing access_token or issued_at")]
    InvalidTokenResponse,

    #[error("token request failed: {0}")]
    Request(#[from] ApiError),
}

/// Failure of the session bootstrap chain, tagged with the step that stopped it
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("failed to list API versions: {0}")]
    Versions(#[source] ApiError),

    #[error("server reported no usable API versions")]
    NoVersions,

    #[error("failed to read object listing: {0}")]
    Objects(#[source] ApiError),
}

/// Why a single result page could not be used
#[derive(Debug, Error)]
pub enum PageFailure {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("malformed query page: {0}")]
    Malformed(String),
}

/// Failure to persist a query result
///
/// Carries no records, even though the fetch that preceded it succeeded.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode query results: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write query results to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a query execution
#[derive(Debug, Error)]
pub enum QueryError {
    /// Field expansion was requested but no `FROM <table>` pair was found
    #[error("cannot expand fields: no table name follows FROM in `{0}`")]
    MissingTable(String),

    #[error("field expansion failed: {0}")]
    Expansion(#[source] ApiError),

    /// Pagination stopped early; `partial_records` holds every record from
    /// the pages that arrived before the failure, in arrival order
    #[error("{source} ({} records fetched before the failure)", .partial_records.len())]
    Pagination {
        #[source]
        source: PageFailure,
        partial_records: Vec<Value>,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl QueryError {
    /// Records recovered before a pagination failure; empty for every other kind
    pub fn partial_records(&self) -> &[Value] {
        match self {
            Self::Pagination {
                partial_records, ..
            } => partial_records,
            _ => &[],
        }
    }
}
